//! Detection writer trait definition.

use crate::detect::Threshold;
use crate::error::Result;
use chrono::NaiveDateTime;

/// Trait for persisting detection timestamps.
pub trait DetectionWriter {
    /// Write the timestamps detected at one threshold.
    fn write_detections(&mut self, threshold: Threshold, timestamps: &[NaiveDateTime]) -> Result<()>;

    /// Finalize the output (flush, close, etc.).
    fn finalize(&mut self) -> Result<()>;
}
