//! Hand-labelled ground-truth logs.

use super::read_timestamp_column;
use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use std::path::Path;

/// Read a species' ground-truth log.
///
/// The first row is the anchor marker, the rest are labelled events. A
/// log without any row has no anchor and is rejected.
pub fn read_ground_truth(path: &Path, species: &str) -> Result<Vec<NaiveDateTime>> {
    let timestamps = read_timestamp_column(path, false, |source| Error::GroundTruthRead {
        path: path.to_path_buf(),
        source,
    })?;

    if timestamps.is_empty() {
        return Err(Error::MissingAnchor {
            species: species.to_string(),
        });
    }
    Ok(timestamps)
}
