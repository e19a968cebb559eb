//! Birdcorr - matched-filter bird call detection.
//!
//! This crate detects known bird calls in recordings by correlating them
//! with reference calls, scores the detections against hand-labelled ground
//! truth as ROC data, and watches daily detection counts for a change.

#![warn(missing_docs)]

pub mod audio;
pub mod cli;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod detect;
pub mod dsp;
pub mod error;
pub mod monitor;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod utils;

use clap::Parser;
use cli::{Cli, Command, CusumArgs, DetectArgs, DetectionArgs, EvaluateArgs, MonitorArgs, StreamArgs};
use config::{
    Config, load_config, load_config_file, resolve_config_path, save_config, validate_config,
};
use detect::Threshold;
use output::{ResultType, emit_json_result, progress};
use pipeline::{
    DetectOptions, StreamOptions, base_time, collect_input_files, evaluate_run,
    load_reference_calls, process_recording, run_name_for, run_stream,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};

pub use error::{Error, Result};

/// Main entry point for birdcorr CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet);

    let config_path = cli.global.config.as_deref();
    match &cli.command {
        Command::Config { action } => handle_config_command(*action, config_path),
        Command::Detect(args) => detect_files(args, load_config(config_path)?, cli.global.quiet),
        Command::Stream(args) => stream_blocks(args, load_config(config_path)?),
        Command::Evaluate(args) => evaluate_runs(args, load_config(config_path)?),
        Command::Monitor(args) => monitor_file(args, load_config(config_path)?),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    // stdout is reserved for results
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Apply detection flags on top of the loaded configuration.
fn apply_detection_args(config: &mut Config, args: &DetectionArgs) {
    if let Some(dir) = &args.output_dir {
        config.paths.output_dir.clone_from(dir);
    }
    if let Some(window) = args.smoothing_window {
        config.detection.smoothing_window = usize::try_from(window).unwrap_or(usize::MAX);
    }
    if args.unscaled {
        config.detection.unscaled = true;
    }
    if let Some(floor) = args.floor {
        config.detection.apply_floor = true;
        config.detection.floor = floor;
    }
    if args.debug_epoch {
        config.detection.debug_epoch = true;
    }
}

/// Apply CUSUM flags on top of the loaded configuration.
fn apply_cusum_args(config: &mut Config, args: &CusumArgs) {
    if let Some(look_back) = args.look_back {
        config.monitor.look_back = usize::try_from(look_back).unwrap_or(usize::MAX);
    }
    if let Some(threshold) = args.cusum_threshold {
        config.monitor.threshold = threshold;
    }
    if let Some(window) = args.look_back_mean {
        config.monitor.look_back_mean = Some(usize::try_from(window).unwrap_or(usize::MAX));
    }
    if let Some(weights) = &args.weights {
        config.monitor.weights = Some(weights.clone());
    }
}

fn reference_call_paths(args: &DetectionArgs, config: &Config) -> Vec<PathBuf> {
    if args.calls.is_empty() {
        vec![config.paths.calls_dir.clone()]
    } else {
        args.calls.clone()
    }
}

fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Run batch detection over every input recording.
fn detect_files(args: &DetectArgs, mut config: Config, quiet: bool) -> Result<()> {
    use std::time::Instant;

    let total_start = Instant::now();

    apply_detection_args(&mut config, &args.detection);
    if let Some(sweep) = args.sweep {
        config.detection.sweep = Some(sweep);
    } else if !args.threshold.is_empty() {
        config.detection.sweep = None;
        config.detection.thresholds.clone_from(&args.threshold);
    }
    validate_config(&config)?;

    let files = collect_input_files(&args.inputs)?;
    if files.is_empty() {
        return Err(Error::NoValidAudioFiles);
    }
    info!("Found {} recording(s) to process", files.len());

    let calls = load_reference_calls(&reference_call_paths(&args.detection, &config))?;
    let options = DetectOptions {
        smoothing_window: config.detection.smoothing_window,
        sweep: config.detection.threshold_sweep()?,
        unscaled: config.detection.unscaled,
        floor: config.detection.floor(),
    };
    info!(
        "Running {} threshold(s) for {} species",
        options.sweep.len(),
        calls.len()
    );

    let pb = progress::create_detection_progress(files.len() * calls.len(), !quiet && !args.json);
    let multiple_inputs = files.len() > 1;
    let mut results = Vec::with_capacity(files.len());
    let mut errors = 0;

    for file in &files {
        let started = now();
        let run_name = run_name_for(file, args.run_name.as_deref(), multiple_inputs, started);
        let run_dir = config.paths.output_dir.join(&run_name);
        let run_start = base_time(config.detection.debug_epoch, started);

        match process_recording(file, &calls, &run_dir, &options, run_start, pb.as_ref()) {
            Ok(result) => {
                if args.fail_fast && !result.failed_species.is_empty() {
                    progress::finish_progress(pb, "Failed");
                    return Err(Error::Internal {
                        message: format!(
                            "detection failed for {} species in {}",
                            result.failed_species.len(),
                            file.display()
                        ),
                    });
                }
                results.push(result);
            }
            Err(e) => {
                error!("Failed to process {}: {e}", file.display());
                errors += 1;
                if args.fail_fast {
                    progress::finish_progress(pb, "Failed");
                    return Err(e);
                }
                progress::advance_progress(pb.as_ref(), calls.len());
            }
        }
    }

    progress::finish_progress(pb, "Complete");

    let total_detections: usize = results.iter().map(|r| r.detections).sum();
    info!(
        "Complete: {} processed, {} errors, {} total detections in {:.2}s",
        results.len(),
        errors,
        total_detections,
        total_start.elapsed().as_secs_f64()
    );
    if errors > 0 {
        warn!("{errors} recording(s) had errors");
    }

    if args.json {
        emit_json_result(ResultType::Detection, &results)?;
    }
    Ok(())
}

/// Process stream blocks in order until done or interrupted.
fn stream_blocks(args: &StreamArgs, mut config: Config) -> Result<()> {
    apply_detection_args(&mut config, &args.detection);
    apply_cusum_args(&mut config, &args.cusum);
    if let Some(check_every) = args.check_every {
        config.monitor.check_every = check_every;
    }
    // live input always gets the floor
    config.detection.apply_floor = true;
    validate_config(&config)?;

    let threshold = match args.threshold {
        Some(value) => Threshold::new(value),
        None => config
            .detection
            .threshold_sweep()?
            .iter()
            .next()
            .ok_or_else(|| Error::Internal {
                message: "threshold sweep is empty".to_string(),
            })?,
    };

    let blocks = collect_input_files(&args.blocks)?;
    if blocks.is_empty() {
        return Err(Error::NoValidAudioFiles);
    }
    let calls = load_reference_calls(&reference_call_paths(&args.detection, &config))?;

    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    if let Err(e) = ctrlc::set_handler(move || handler_stop.store(true, Ordering::SeqCst)) {
        warn!("Failed to install Ctrl+C handler: {e}");
    }

    let options = StreamOptions {
        threshold,
        smoothing_window: config.detection.smoothing_window,
        unscaled: config.detection.unscaled,
        floor: config.detection.floor,
        output_dir: config.paths.output_dir.clone(),
        run_start: base_time(config.detection.debug_epoch, now()),
        cusum: config.monitor.params(),
        check_every: config.monitor.check_every,
    };
    info!(
        "Streaming {} block(s) for {} species at threshold {threshold}",
        blocks.len(),
        calls.len()
    );

    let summary = run_stream(&blocks, &calls, &options, &stop)?;
    info!(
        "Stream finished: {} block(s) processed, {} failed{}",
        summary.blocks_processed,
        summary.blocks_failed,
        if summary.interrupted { " (interrupted)" } else { "" }
    );

    if args.json {
        emit_json_result(ResultType::Stream, &summary)?;
    }
    Ok(())
}

/// Score persisted runs and write ROC datasets.
fn evaluate_runs(args: &EvaluateArgs, mut config: Config) -> Result<()> {
    if let Some(dir) = &args.truth_dir {
        config.paths.truth_dir.clone_from(dir);
    }
    if let Some(dir) = &args.roc_dir {
        config.paths.roc_dir.clone_from(dir);
    }
    if let Some(tolerance) = args.tolerance {
        config.scoring.tolerance = tolerance;
    }
    if let Some(total) = args.total_events {
        config.scoring.total_events = total;
    }
    if args.corrected_fp {
        config.scoring.legacy_fp_offset = false;
    }
    validate_config(&config)?;

    let params = config.scoring.params();
    let mut summaries = Vec::with_capacity(args.run_dirs.len());

    for run_dir in &args.run_dirs {
        info!("Evaluating run: {}", run_dir.display());
        match evaluate_run(run_dir, &config.paths.truth_dir, &config.paths.roc_dir, &params) {
            Ok(summary) => {
                info!(
                    "{}: {} species scored, {} failed",
                    run_dir.display(),
                    summary.species.len(),
                    summary.failed_species.len()
                );
                summaries.push(summary);
            }
            Err(e) => error!("Failed to evaluate {}: {e}", run_dir.display()),
        }
    }

    if args.json {
        emit_json_result(ResultType::Evaluation, &summaries)?;
    }
    Ok(())
}

/// Test a persisted stream file for a change in daily counts.
#[allow(clippy::print_stdout)]
fn monitor_file(args: &MonitorArgs, mut config: Config) -> Result<()> {
    apply_cusum_args(&mut config, &args.cusum);
    validate_config(&config)?;

    let report = pipeline::assess_stream_file(&args.file, &config.monitor.params())?;

    if args.json {
        emit_json_result(ResultType::Monitor, &report)?;
    } else {
        println!("{}: {}", args.file.display(), report.verdict.reason());
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn handle_config_command(action: cli::ConfigAction, explicit: Option<&Path>) -> Result<()> {
    use cli::ConfigAction;

    let path = resolve_config_path(explicit)?;
    match action {
        ConfigAction::Init => {
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                save_config(&Config::default(), &path)?;
                println!("Created configuration file: {}", path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_config_file(&path)?;
            let text = toml::to_string_pretty(&config).map_err(|source| Error::ConfigSerialize { source })?;
            println!("{text}");
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}
