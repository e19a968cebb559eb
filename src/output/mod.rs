//! Output writers.

mod files;
pub mod json_envelope;
pub mod progress;
mod roc;
mod writer;

pub use files::{BatchCsvWriter, StreamCsvWriter, write_table};
pub use json_envelope::{ResultType, emit_json_result};
pub use roc::write_roc_dataset;
pub use writer::DetectionWriter;
