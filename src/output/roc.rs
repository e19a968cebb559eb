//! ROC dataset CSV writer.

use crate::constants::{extensions, roc_columns};
use crate::error::{Error, Result};
use crate::output::files::ensure_dir;
use crate::scoring::RocDataset;
use std::path::{Path, PathBuf};

const HEADER: [&str; 8] = [
    roc_columns::SPECIES,
    roc_columns::THRESHOLD,
    roc_columns::TRUE_POSITIVES,
    roc_columns::FALSE_POSITIVES,
    roc_columns::TRUE_NEGATIVES,
    roc_columns::FALSE_NEGATIVES,
    roc_columns::FALSE_ALARM_RATE,
    roc_columns::TRUE_POSITIVE_RATE,
];

/// Write `dataset` to `<roc_dir>/<species>.csv`, replacing any previous file.
pub fn write_roc_dataset(roc_dir: &Path, dataset: &RocDataset) -> Result<PathBuf> {
    ensure_dir(roc_dir)?;
    let path = roc_dir.join(format!("{}.{}", dataset.species, extensions::CSV));
    let csv_err = |source| Error::CsvWrite {
        path: path.clone(),
        source,
    };

    let mut writer = csv::Writer::from_path(&path).map_err(csv_err)?;
    writer.write_record(HEADER).map_err(csv_err)?;
    for row in &dataset.rows {
        let c = &row.counts;
        writer
            .write_record([
                row.species.clone(),
                row.threshold.to_string(),
                c.true_positives.to_string(),
                c.false_positives.to_string(),
                c.true_negatives.to_string(),
                c.false_negatives.to_string(),
                row.false_alarm_rate.to_string(),
                row.true_positive_rate.to_string(),
            ])
            .map_err(csv_err)?;
    }
    writer.flush()?;

    Ok(path)
}
