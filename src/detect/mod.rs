//! Matched-filter call detection.
//!
//! A recording is correlated against a species' reference call
//! ([`correlate`]), and the resulting energy envelope is searched for peaks
//! once per sensitivity threshold ([`extract`]), giving a [`DetectionTable`]
//! of timestamps keyed by threshold.

mod correlator;
mod extractor;
mod peaks;
mod types;

pub use correlator::correlate;
pub use extractor::{ExtractOptions, decision_level, extract, sample_to_timestamp};
pub use peaks::find_peaks;
pub use types::{
    AudioSegment, DetectionEvent, DetectionTable, Envelope, ReferenceCall, Threshold,
    ThresholdSweep,
};
