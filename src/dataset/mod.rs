//! Readers for ground-truth logs and persisted detections.

mod detections;
mod ground_truth;

pub use detections::{read_detection_file, read_species_run};
pub use ground_truth::read_ground_truth;

use crate::error::{Error, Result};
use crate::utils::time::parse_timestamp;
use chrono::NaiveDateTime;
use std::path::Path;

/// Read the first field of every non-empty row as a timestamp.
///
/// `map_csv` wraps reader errors in the caller's error variant. When
/// `skip_numeric_header` is set, a first row holding a bare number is
/// ignored (older detection files carried the threshold as a header).
fn read_timestamp_column(
    path: &Path,
    skip_numeric_header: bool,
    map_csv: impl Fn(csv::Error) -> Error,
) -> Result<Vec<NaiveDateTime>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(&map_csv)?;

    let mut timestamps = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(&map_csv)?;
        let Some(field) = record.get(0).filter(|f| !f.is_empty()) else {
            continue;
        };
        if row == 0 && skip_numeric_header && field.parse::<f64>().is_ok() {
            continue;
        }
        let line = record
            .position()
            .map_or(row + 1, |p| usize::try_from(p.line()).unwrap_or(row + 1));
        let ts = parse_timestamp(field).map_err(|source| Error::TimestampParse {
            path: path.to_path_buf(),
            line,
            value: field.to_string(),
            source,
        })?;
        timestamps.push(ts);
    }

    Ok(timestamps)
}
