//! Configuration type definitions.

use crate::constants::{detection, monitor, paths, scoring};
use crate::detect::ThresholdSweep;
use crate::error::Result;
use crate::monitor::CusumParams;
use crate::scoring::{FalsePositivePolicy, ScoreParams};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Detection settings.
    pub detection: DetectionConfig,

    /// Scoring settings.
    pub scoring: ScoringConfig,

    /// Change monitor settings.
    pub monitor: MonitorConfig,

    /// Directory layout.
    pub paths: PathsConfig,
}

/// Detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Moving-average length applied to the squared correlation.
    pub smoothing_window: usize,

    /// Thresholds to run, in standard deviations. Ignored when `sweep` is set.
    pub thresholds: Vec<f64>,

    /// Evenly spaced thresholds (stop exclusive).
    pub sweep: Option<SweepConfig>,

    /// Use `k * std` as the decision level instead of `mean + k * std`.
    pub unscaled: bool,

    /// Never let the decision level drop below `floor`.
    pub apply_floor: bool,

    /// Minimum decision level when `apply_floor` is set.
    pub floor: f64,

    /// Base timestamps at 2000-01-01 instead of the run start.
    pub debug_epoch: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            smoothing_window: detection::DEFAULT_SMOOTHING_WINDOW,
            thresholds: vec![detection::DEFAULT_THRESHOLD],
            sweep: None,
            unscaled: false,
            apply_floor: false,
            floor: detection::DEFAULT_LIVE_FLOOR,
            debug_epoch: false,
        }
    }
}

impl DetectionConfig {
    /// Thresholds to run.
    pub fn threshold_sweep(&self) -> Result<ThresholdSweep> {
        match &self.sweep {
            Some(sweep) => ThresholdSweep::range(sweep.start, sweep.stop, sweep.step),
            None => ThresholdSweep::from_values(&self.thresholds),
        }
    }

    /// Decision floor, if enabled.
    pub fn floor(&self) -> Option<f64> {
        self.apply_floor.then_some(self.floor)
    }
}

/// Evenly spaced threshold range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// First threshold.
    pub start: f64,
    /// Exclusive upper bound.
    pub stop: f64,
    /// Spacing.
    pub step: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start: detection::FINE_SWEEP_START,
            stop: detection::FINE_SWEEP_STOP,
            step: detection::FINE_SWEEP_STEP,
        }
    }
}

/// Scoring settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Match window width in seconds.
    pub tolerance: f64,

    /// Total true events across the evaluation corpus.
    pub total_events: u32,

    /// Count false positives as `detections - TP + 1`.
    pub legacy_fp_offset: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            tolerance: scoring::DEFAULT_TOLERANCE,
            total_events: scoring::DEFAULT_TOTAL_EVENTS,
            legacy_fp_offset: true,
        }
    }
}

impl ScoringConfig {
    /// Scoring parameters for this configuration.
    pub fn params(&self) -> ScoreParams {
        ScoreParams {
            tolerance: self.tolerance,
            total_events: self.total_events,
            fp_policy: if self.legacy_fp_offset {
                FalsePositivePolicy::Legacy
            } else {
                FalsePositivePolicy::Corrected
            },
        }
    }
}

/// Change monitor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Number of most recent days inspected.
    pub look_back: usize,

    /// Decision threshold on each cumulative sum.
    pub threshold: f64,

    /// Baseline window length in days; whole history when unset.
    pub look_back_mean: Option<usize>,

    /// Per-lag dead band.
    pub weights: Option<Vec<f64>>,

    /// Run the monitor every this many stream blocks.
    pub check_every: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            look_back: monitor::DEFAULT_LOOK_BACK,
            threshold: monitor::DEFAULT_THRESHOLD,
            look_back_mean: None,
            weights: None,
            check_every: monitor::DEFAULT_CHECK_EVERY,
        }
    }
}

impl MonitorConfig {
    /// CUSUM parameters for this configuration.
    pub fn params(&self) -> CusumParams {
        CusumParams {
            look_back: self.look_back,
            threshold: self.threshold,
            weights: self.weights.clone(),
            look_back_mean: self.look_back_mean,
        }
    }
}

/// Directory layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Reference call library.
    pub calls_dir: PathBuf,

    /// Persisted detections.
    pub output_dir: PathBuf,

    /// Ground-truth logs.
    pub truth_dir: PathBuf,

    /// ROC datasets.
    pub roc_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            calls_dir: PathBuf::from(paths::CALLS_DIR),
            output_dir: PathBuf::from(paths::OUTPUT_DIR),
            truth_dir: PathBuf::from(paths::TRUTH_DIR),
            roc_dir: PathBuf::from(paths::ROC_DIR),
        }
    }
}
