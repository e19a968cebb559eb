//! Run drivers: batch detection, streaming, and evaluation.

mod coordinator;
mod evaluate;
mod processor;
mod stream;

pub use coordinator::{
    base_time, collect_input_files, load_reference_calls, run_name_for, species_from_dir_name,
};
pub use evaluate::{EvaluationSummary, SpeciesEvaluation, evaluate_run};
pub use processor::{DetectOptions, ProcessResult, detect_species, process_recording};
pub use stream::{
    SpeciesReport, StreamOptions, StreamState, StreamSummary, assess_stream_file, run_stream,
};
