//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "birdcorr";

/// Timestamp format used for every persisted timestamp (microsecond precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Format of the timestamp suffix in generated run directory names.
pub const RUN_NAME_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Prefix of generated run directory names.
pub const RUN_NAME_PREFIX: &str = "Correlation";

/// Separator between an optional label and the species id in run sub-directories.
pub const SPECIES_DIR_SEPARATOR: &str = "--";

/// Detection stage defaults.
pub mod detection {
    /// Moving-average length applied to the squared correlation.
    pub const DEFAULT_SMOOTHING_WINDOW: usize = 10_000;

    /// Default sensitivity, in standard deviations.
    pub const DEFAULT_THRESHOLD: f64 = 3.0;

    /// Minimum decision level used on live input.
    ///
    /// Scaled for raw 16-bit amplitudes; without it a near-silent block
    /// collapses the standard deviation and everything becomes a peak.
    pub const DEFAULT_LIVE_FLOOR: f64 = 1e16;

    /// Fine sweep used for ROC evaluation: start (inclusive).
    pub const FINE_SWEEP_START: f64 = 0.0;

    /// Fine sweep used for ROC evaluation: stop (exclusive).
    pub const FINE_SWEEP_STOP: f64 = 0.005;

    /// Fine sweep used for ROC evaluation: step.
    pub const FINE_SWEEP_STEP: f64 = 0.0001;

    /// Decimal places kept when generating sweep values.
    pub const SWEEP_DECIMALS: i32 = 10;

    /// Base date for timestamps in debug-epoch mode.
    pub const DEBUG_EPOCH: (i32, u32, u32) = (2000, 1, 1);
}

/// Scoring defaults.
pub mod scoring {
    /// Width of the tolerance window in seconds.
    pub const DEFAULT_TOLERANCE: f64 = 3.0;

    /// Total number of true events across the evaluation corpus.
    pub const DEFAULT_TOTAL_EVENTS: u32 = 600;
}

/// Change monitor defaults.
pub mod monitor {
    /// Number of most recent days inspected by CUSUM.
    pub const DEFAULT_LOOK_BACK: usize = 5;

    /// CUSUM decision threshold.
    pub const DEFAULT_THRESHOLD: f64 = 2.0;

    /// Run the change monitor every this many blocks in streaming mode.
    pub const DEFAULT_CHECK_EVERY: u32 = 5;
}

/// Default directory names.
pub mod paths {
    /// Reference call library.
    pub const CALLS_DIR: &str = "Test Bird Calls";
    /// Persisted detections.
    pub const OUTPUT_DIR: &str = "Detected Peaks";
    /// Hand-labelled ground-truth logs.
    pub const TRUTH_DIR: &str = "Actual Results";
    /// ROC datasets.
    pub const ROC_DIR: &str = "ROC Data";
}

/// File extensions.
pub mod extensions {
    /// Audio inputs and reference calls.
    pub const WAV: &str = "wav";
    /// Detection files, ground-truth logs and ROC datasets.
    pub const CSV: &str = "csv";
}

/// ROC dataset column headers.
pub mod roc_columns {
    /// Species column.
    pub const SPECIES: &str = "Bird";
    /// Threshold column.
    pub const THRESHOLD: &str = "Threshold (# std)";
    /// True positives column.
    pub const TRUE_POSITIVES: &str = "True Positives";
    /// False positives column.
    pub const FALSE_POSITIVES: &str = "False Positives";
    /// True negatives column.
    pub const TRUE_NEGATIVES: &str = "True Negatives";
    /// False negatives column.
    pub const FALSE_NEGATIVES: &str = "False Negatives";
    /// False alarm rate column.
    pub const FALSE_ALARM_RATE: &str = "False Alarm Rate";
    /// True positive rate column.
    pub const TRUE_POSITIVE_RATE: &str = "True Positive Rate";
}
