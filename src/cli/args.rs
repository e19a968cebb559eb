//! CLI argument definitions.

use crate::cli::validators::{parse_finite_float, parse_positive_float, parse_sweep};
use crate::config::SweepConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Matched-filter bird call detection, ROC evaluation and change monitoring.
#[derive(Debug, Parser)]
#[command(name = "birdcorr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Configuration file (default: platform config directory).
    #[arg(long, global = true, env = "BIRDCORR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Only log warnings and errors; hide progress bars.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Detect calls in recordings and write one file per threshold.
    Detect(DetectArgs),
    /// Process recorded blocks in order, appending detections and monitoring daily counts.
    Stream(StreamArgs),
    /// Score persisted runs against ground truth and write ROC datasets.
    Evaluate(EvaluateArgs),
    /// Test a stream file's daily counts for a change.
    Monitor(MonitorArgs),
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Detection options shared by `detect` and `stream`.
#[derive(Debug, Args)]
pub struct DetectionArgs {
    /// Reference call files or directories (overrides config).
    #[arg(long, env = "BIRDCORR_CALLS_DIR")]
    pub calls: Vec<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long, env = "BIRDCORR_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Moving-average length in samples.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..), env = "BIRDCORR_SMOOTHING_WINDOW")]
    pub smoothing_window: Option<u64>,

    /// Use `k * std` as the decision level instead of `mean + k * std`.
    #[arg(long)]
    pub unscaled: bool,

    /// Minimum decision level.
    #[arg(long, value_parser = parse_finite_float, env = "BIRDCORR_FLOOR")]
    pub floor: Option<f64>,

    /// Base timestamps at 2000-01-01 instead of the current time.
    #[arg(long)]
    pub debug_epoch: bool,
}

/// Arguments for the `detect` command.
#[derive(Debug, Args)]
pub struct DetectArgs {
    /// Recordings (WAV files or directories).
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Detection options.
    #[command(flatten)]
    pub detection: DetectionArgs,

    /// Thresholds in standard deviations (comma-separated).
    #[arg(short, long, value_delimiter = ',', value_parser = parse_finite_float,
          conflicts_with = "sweep", env = "BIRDCORR_THRESHOLDS")]
    pub threshold: Vec<f64>,

    /// Evenly spaced thresholds as start:stop:step (stop exclusive).
    #[arg(long, value_parser = parse_sweep)]
    pub sweep: Option<SweepConfig>,

    /// Run directory name (suffixed with the recording name for several inputs).
    #[arg(long)]
    pub run_name: Option<String>,

    /// Stop on first error.
    #[arg(long)]
    pub fail_fast: bool,

    /// Print a JSON summary.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `stream` command.
#[derive(Debug, Args)]
pub struct StreamArgs {
    /// Block recordings in capture order (block i is day i).
    #[arg(required = true)]
    pub blocks: Vec<PathBuf>,

    /// Detection options.
    #[command(flatten)]
    pub detection: DetectionArgs,

    /// Detection threshold in standard deviations.
    #[arg(short, long, value_parser = parse_finite_float, env = "BIRDCORR_THRESHOLD")]
    pub threshold: Option<f64>,

    /// Run the change monitor every this many blocks.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub check_every: Option<u32>,

    /// Change monitor options.
    #[command(flatten)]
    pub cusum: CusumArgs,

    /// Print a JSON summary.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `evaluate` command.
#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// Run directories written by `detect`.
    #[arg(required = true)]
    pub run_dirs: Vec<PathBuf>,

    /// Ground-truth directory (overrides config).
    #[arg(long, env = "BIRDCORR_TRUTH_DIR")]
    pub truth_dir: Option<PathBuf>,

    /// ROC output directory (overrides config).
    #[arg(long, env = "BIRDCORR_ROC_DIR")]
    pub roc_dir: Option<PathBuf>,

    /// Match window width in seconds.
    #[arg(long, value_parser = parse_positive_float, env = "BIRDCORR_TOLERANCE")]
    pub tolerance: Option<f64>,

    /// Total true events across the evaluation corpus.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..), env = "BIRDCORR_TOTAL_EVENTS")]
    pub total_events: Option<u32>,

    /// Count false positives as detections minus true positives (no +1).
    #[arg(long)]
    pub corrected_fp: bool,

    /// Print a JSON summary.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `monitor` command.
#[derive(Debug, Args)]
pub struct MonitorArgs {
    /// Stream file written by `stream`.
    pub file: PathBuf,

    /// Change monitor options.
    #[command(flatten)]
    pub cusum: CusumArgs,

    /// Print the verdict as JSON.
    #[arg(long)]
    pub json: bool,
}

/// CUSUM overrides.
#[derive(Debug, Args)]
pub struct CusumArgs {
    /// Number of most recent days inspected.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub look_back: Option<u64>,

    /// Decision threshold on each cumulative sum.
    #[arg(long, value_parser = parse_finite_float)]
    pub cusum_threshold: Option<f64>,

    /// Baseline window in days (default: whole history).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub look_back_mean: Option<u64>,

    /// Per-lag dead band (comma-separated, at least look-back values).
    #[arg(long, value_delimiter = ',', value_parser = parse_finite_float)]
    pub weights: Option<Vec<f64>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_detect() {
        let cli = Cli::try_parse_from([
            "birdcorr", "detect", "dawn.wav", "--calls", "calls", "-t", "1,2.5", "-q",
        ])
        .unwrap();
        let Command::Detect(args) = cli.command else {
            panic!("expected detect");
        };
        assert_eq!(args.inputs, vec![PathBuf::from("dawn.wav")]);
        assert_eq!(args.threshold, vec![1.0, 2.5]);
        assert!(cli.global.quiet);
    }

    #[test]
    fn test_threshold_conflicts_with_sweep() {
        let result = Cli::try_parse_from([
            "birdcorr", "detect", "dawn.wav", "-t", "3", "--sweep", "0:1:0.5",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_evaluate() {
        let cli = Cli::try_parse_from([
            "birdcorr", "evaluate", "run", "--tolerance", "2.5", "--corrected-fp",
        ])
        .unwrap();
        let Command::Evaluate(args) = cli.command else {
            panic!("expected evaluate");
        };
        assert_eq!(args.tolerance, Some(2.5));
        assert!(args.corrected_fp);
    }

    #[test]
    fn test_zero_tolerance_rejected() {
        assert!(Cli::try_parse_from(["birdcorr", "evaluate", "run", "--tolerance", "0"]).is_err());
    }

    #[test]
    fn test_parse_monitor_weights() {
        let cli = Cli::try_parse_from([
            "birdcorr", "monitor", "wren.csv", "--look-back", "3", "--weights", "0,1,1",
        ])
        .unwrap();
        let Command::Monitor(args) = cli.command else {
            panic!("expected monitor");
        };
        assert_eq!(args.cusum.look_back, Some(3));
        assert_eq!(args.cusum.weights, Some(vec![0.0, 1.0, 1.0]));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["birdcorr", "config", "path", "-vv"]).unwrap();
        assert_eq!(cli.global.verbose, 2);
    }
}
