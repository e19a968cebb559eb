//! Streaming driver: fixed-duration blocks processed in order.
//!
//! Block `i` is treated as day `i` of the deployment. Each block's
//! detections are appended to the species' stream file and its count to
//! the species' [`DailyCountSeries`]; the change monitor runs every
//! `check_every` blocks.

use crate::audio::load_segment;
use crate::dataset::read_detection_file;
use crate::detect::{AudioSegment, ReferenceCall, Threshold, ThresholdSweep};
use crate::error::{Error, Result};
use crate::monitor::{CusumParams, DailyCountSeries, MonitorReport, assess};
use crate::output::{DetectionWriter, StreamCsvWriter};
use crate::pipeline::processor::{DetectOptions, detect_species};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info, warn};

/// Settings for a streaming run.
#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// Single detection threshold.
    pub threshold: Threshold,
    /// Moving-average length applied to the squared correlation.
    pub smoothing_window: usize,
    /// Use `k * std` as the decision level.
    pub unscaled: bool,
    /// Minimum decision level.
    pub floor: f64,
    /// Directory holding the `<species>.csv` stream files.
    pub output_dir: PathBuf,
    /// Time of the first sample of block 0.
    pub run_start: NaiveDateTime,
    /// Change monitor parameters.
    pub cusum: CusumParams,
    /// Run the change monitor every this many blocks.
    pub check_every: u32,
}

/// Verdict for one species at one check.
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesReport {
    /// Species identifier.
    pub species: String,
    /// Change monitor report.
    #[serde(flatten)]
    pub report: MonitorReport,
}

/// Outcome of a streaming run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StreamSummary {
    /// Blocks processed successfully.
    pub blocks_processed: usize,
    /// Blocks that failed to load or where every species failed.
    pub blocks_failed: usize,
    /// Whether the run was stopped before the last block.
    pub interrupted: bool,
    /// Verdicts from the most recent check.
    pub reports: Vec<SpeciesReport>,
}

/// In-memory state carried across blocks.
#[derive(Debug, Default)]
pub struct StreamState {
    series: BTreeMap<String, DailyCountSeries>,
}

impl StreamState {
    /// Empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `count` detections for `species` on the next day.
    pub fn append(&mut self, species: &str, count: u64) {
        self.series
            .entry(species.to_string())
            .or_default()
            .append(count);
    }

    /// Daily series for `species`.
    pub fn series(&self, species: &str) -> Option<&DailyCountSeries> {
        self.series.get(species)
    }

    /// Run the change monitor for every species.
    pub fn check(&self, params: &CusumParams) -> Result<Vec<SpeciesReport>> {
        let mut reports = Vec::with_capacity(self.series.len());
        for (species, series) in &self.series {
            let report = assess(series, params, None)?;
            log_verdict(species, &report);
            reports.push(SpeciesReport {
                species: species.clone(),
                report,
            });
        }
        Ok(reports)
    }
}

fn log_verdict(species: &str, report: &MonitorReport) {
    let verdict = &report.verdict;
    match verdict.statistics() {
        Some(stats) if verdict.changed() => warn!(
            "{species}: {} in daily detections over {} day(s) (baseline {:.2}, +{:.2}, -{:.2})",
            verdict.reason(),
            report.days,
            stats.baseline,
            stats.positive,
            stats.negative
        ),
        _ => info!("{species}: {} ({} day(s))", verdict.reason(), report.days),
    }
}

/// Process `blocks` in order until done or `stop` is set.
///
/// `stop` is checked between blocks, never during one.
pub fn run_stream(
    blocks: &[PathBuf],
    calls: &[ReferenceCall],
    options: &StreamOptions,
    stop: &AtomicBool,
) -> Result<StreamSummary> {
    let detect_options = DetectOptions {
        smoothing_window: options.smoothing_window,
        sweep: ThresholdSweep::single(options.threshold.value()),
        unscaled: options.unscaled,
        floor: Some(options.floor),
    };
    let check_every = options.check_every.max(1) as usize;

    let mut state = StreamState::new();
    let mut summary = StreamSummary::default();

    for (index, block) in blocks.iter().enumerate() {
        if stop.load(Ordering::SeqCst) {
            info!("Stopping after {index} block(s)");
            summary.interrupted = true;
            break;
        }

        let day_offset = u32::try_from(index).unwrap_or(u32::MAX);
        match process_block(block, calls, &detect_options, options, day_offset, &mut state) {
            Ok(()) => summary.blocks_processed += 1,
            Err(e) => {
                error!("Block {} ({}): {e}", index, block.display());
                summary.blocks_failed += 1;
            }
        }

        if (index + 1) % check_every == 0 {
            summary.reports = state.check(&options.cusum)?;
        }
    }

    Ok(summary)
}

/// Detect and persist every species for one block.
///
/// A species gets a day only when its detections were written. The block
/// fails when no species succeeded.
fn process_block(
    block: &Path,
    calls: &[ReferenceCall],
    detect_options: &DetectOptions,
    options: &StreamOptions,
    day_offset: u32,
    state: &mut StreamState,
) -> Result<()> {
    let segment = load_segment(block)?;
    debug!("Block {day_offset}: {:.1}s of audio", segment.duration_secs());

    let mut succeeded = 0;
    for call in calls {
        match record_species(&segment, call, detect_options, options, day_offset) {
            Ok(count) => {
                state.append(call.species(), count);
                succeeded += 1;
                debug!("{}: {count} detection(s)", call.species());
            }
            Err(e) => error!("{} in block {day_offset}: {e}", call.species()),
        }
    }

    if succeeded == 0 && !calls.is_empty() {
        return Err(Error::StreamBlock {
            path: block.to_path_buf(),
            species: calls.len(),
        });
    }
    Ok(())
}

fn record_species(
    segment: &AudioSegment,
    call: &ReferenceCall,
    detect_options: &DetectOptions,
    options: &StreamOptions,
    day_offset: u32,
) -> Result<u64> {
    let table = detect_species(segment, call, detect_options, options.run_start, day_offset)?;
    let timestamps = table.get(options.threshold);

    let mut writer = StreamCsvWriter::open(&options.output_dir, call.species())?;
    writer.write_detections(options.threshold, timestamps)?;
    writer.finalize()?;

    Ok(timestamps.len() as u64)
}

/// Rebuild the daily series from a persisted stream file and test it.
pub fn assess_stream_file(path: &Path, params: &CusumParams) -> Result<MonitorReport> {
    let timestamps = read_detection_file(path)?;
    let series = DailyCountSeries::from_timestamps(timestamps);
    info!(
        "{}: {} day(s) of detections",
        path.display(),
        series.len()
    );
    assess(&series, params, None)
}
