//! Batch processing of one recording against every reference call.

use crate::audio::load_segment;
use crate::detect::{
    AudioSegment, DetectionTable, ExtractOptions, ReferenceCall, ThresholdSweep, correlate,
    extract,
};
use crate::error::Result;
use crate::output::{BatchCsvWriter, progress, write_table};
use chrono::NaiveDateTime;
use indicatif::ProgressBar;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Detection settings shared by every species in a run.
#[derive(Debug, Clone)]
pub struct DetectOptions {
    /// Moving-average length applied to the squared correlation.
    pub smoothing_window: usize,
    /// Thresholds to run.
    pub sweep: ThresholdSweep,
    /// Use `k * std` as the decision level.
    pub unscaled: bool,
    /// Minimum decision level, if any.
    pub floor: Option<f64>,
}

/// Outcome of processing one recording.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessResult {
    /// Recording that was processed.
    pub input: PathBuf,
    /// Run directory the detections were written to.
    pub run_dir: PathBuf,
    /// Species whose detections were written.
    pub species: Vec<String>,
    /// Species that failed.
    pub failed_species: Vec<String>,
    /// Detections written, summed over species and thresholds.
    pub detections: usize,
    /// Wall-clock processing time.
    pub duration_secs: f64,
}

/// Correlate `segment` with `call` and extract detections for every threshold.
pub fn detect_species(
    segment: &AudioSegment,
    call: &ReferenceCall,
    options: &DetectOptions,
    run_start: NaiveDateTime,
    day_offset: u32,
) -> Result<DetectionTable> {
    if call.sample_rate() != segment.sample_rate() {
        warn!(
            "{}: reference call is {} Hz but the recording is {} Hz",
            call.species(),
            call.sample_rate(),
            segment.sample_rate()
        );
    }

    let start = Instant::now();
    let envelope = correlate(segment, call, options.smoothing_window)?;
    debug!(
        "{}: correlated {} samples in {:.2}s",
        call.species(),
        segment.len(),
        start.elapsed().as_secs_f64()
    );

    let extract_options = ExtractOptions {
        sample_rate: segment.sample_rate(),
        run_start,
        day_offset,
        unscaled: options.unscaled,
        floor: options.floor,
    };
    extract(call.species(), &envelope, &options.sweep, &extract_options)
}

/// Process one recording: detect every species and write
/// `<run_dir>/<species>/<threshold>.csv`.
///
/// A species that fails is logged and skipped; the others are still written.
pub fn process_recording(
    input: &Path,
    calls: &[ReferenceCall],
    run_dir: &Path,
    options: &DetectOptions,
    run_start: NaiveDateTime,
    pb: Option<&ProgressBar>,
) -> Result<ProcessResult> {
    let start_time = Instant::now();

    info!("Processing: {}", input.display());
    let segment = load_segment(input)?;
    info!(
        "Loaded {:.1}s of audio at {} Hz",
        segment.duration_secs(),
        segment.sample_rate()
    );

    let mut result = ProcessResult {
        input: input.to_path_buf(),
        run_dir: run_dir.to_path_buf(),
        species: Vec::new(),
        failed_species: Vec::new(),
        detections: 0,
        duration_secs: 0.0,
    };

    for call in calls {
        progress::set_progress_message(pb, call.species());
        let outcome = detect_species(&segment, call, options, run_start, 0).and_then(|table| {
            let mut writer = BatchCsvWriter::new(run_dir, call.species())?;
            write_table(&mut writer, &table)?;
            Ok(table.detection_count())
        });

        match outcome {
            Ok(count) => {
                debug!("{}: {count} detection(s) written", call.species());
                result.detections += count;
                result.species.push(call.species().to_string());
            }
            Err(e) => {
                error!("{} in {}: {e}", call.species(), input.display());
                result.failed_species.push(call.species().to_string());
            }
        }
        progress::inc_progress(pb);
    }

    result.duration_secs = start_time.elapsed().as_secs_f64();
    info!(
        "Wrote {} detection(s) for {} species in {:.2}s",
        result.detections,
        result.species.len(),
        result.duration_secs
    );

    Ok(result)
}
