//! Persisted detection files.

use super::read_timestamp_column;
use crate::constants::extensions;
use crate::detect::{DetectionTable, Threshold};
use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use std::path::Path;
use tracing::{debug, warn};

/// Read one detection file: a batch `<threshold>.csv` or a stream file.
///
/// An empty file means no detections.
pub fn read_detection_file(path: &Path) -> Result<Vec<NaiveDateTime>> {
    read_timestamp_column(path, true, |source| Error::DetectionParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read every `<threshold>.csv` in a species directory of a batch run.
///
/// Files whose stem is not a threshold are skipped.
pub fn read_species_run(dir: &Path, species: &str) -> Result<DetectionTable> {
    let mut table = DetectionTable::new(species);

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file()
            || !path
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case(extensions::CSV))
        {
            continue;
        }

        let Some(threshold) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<Threshold>().ok())
        else {
            warn!("Skipping non-threshold file: {}", path.display());
            continue;
        };

        let timestamps = read_detection_file(&path)?;
        debug!(
            "{species} @ {threshold}: {} detections from {}",
            timestamps.len(),
            path.display()
        );
        table.insert(threshold, timestamps);
    }

    Ok(table)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_is_no_detections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("3.csv");
        fs::write(&path, "").unwrap();
        assert!(read_detection_file(&path).unwrap().is_empty());
    }

    #[test]
    fn test_legacy_threshold_header_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("0.5.csv");
        fs::write(&path, "0.5\n2000-01-01T00:00:01.000000\n").unwrap();
        assert_eq!(read_detection_file(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_species_run_keys_by_threshold() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("3.csv"),
            "2000-01-01T00:00:01.000000\n2000-01-01T00:00:05.000000\n",
        )
        .unwrap();
        fs::write(dir.path().join("0.0001.csv"), "").unwrap();
        fs::write(dir.path().join("notes.csv"), "").unwrap();
        fs::write(dir.path().join("3.txt"), "").unwrap();

        let table = read_species_run(dir.path(), "wren").unwrap();
        let thresholds: Vec<_> = table.thresholds().map(Threshold::value).collect();
        assert_eq!(thresholds, vec![0.0001, 3.0]);
        assert_eq!(table.get(Threshold::new(3.0)).len(), 2);
        assert!(table.get(Threshold::new(0.0001)).is_empty());
    }
}
