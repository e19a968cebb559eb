//! End-to-end detection on synthetic recordings.

#![allow(clippy::unwrap_used, clippy::float_cmp, clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use birdcorr::dataset::read_detection_file;
use birdcorr::detect::{Threshold, ThresholdSweep};
use birdcorr::monitor::{ChangeVerdict, CusumParams};
use birdcorr::pipeline::{
    DetectOptions, StreamOptions, evaluate_run, load_reference_calls, process_recording,
    run_stream,
};
use birdcorr::scoring::{FalsePositivePolicy, ScoreParams};
use birdcorr::utils::time::{debug_epoch, format_timestamp};
use chrono::TimeDelta;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use tempfile::TempDir;

const RATE: u32 = 8000;
const CALL_LEN: usize = 800;
const WINDOW: usize = 400;
const CALL_SECONDS: [usize; 4] = [1, 3, 5, 7];

/// Linear chirp from 500 Hz to 2500 Hz.
fn chirp() -> Vec<i16> {
    (0..CALL_LEN)
        .map(|k| {
            let t = k as f64 / f64::from(RATE);
            let sweep = 2000.0 * k as f64 / (2.0 * CALL_LEN as f64);
            (8000.0 * (2.0 * PI * (500.0 + sweep) * t).sin()) as i16
        })
        .collect()
}

/// Low-level deterministic noise with the chirp inserted at each `CALL_SECONDS`.
fn recording(seconds: usize) -> Vec<i16> {
    let mut state: u32 = 12_345;
    let mut samples: Vec<i16> = (0..seconds * RATE as usize)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            ((state >> 16) % 101) as i16 - 50
        })
        .collect();

    let call = chirp();
    for second in CALL_SECONDS {
        let start = second * RATE as usize;
        for (k, &c) in call.iter().enumerate() {
            samples[start + k] = samples[start + k].saturating_add(c);
        }
    }
    samples
}

fn write_wav(path: &Path, samples: &[i16]) {
    let spec = WavSpec {
        channels: 1,
        sample_rate: RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

fn options() -> DetectOptions {
    DetectOptions {
        smoothing_window: WINDOW,
        sweep: ThresholdSweep::from_values(&[3.0]).unwrap(),
        unscaled: false,
        floor: None,
    }
}

#[test]
fn test_calls_detected_where_inserted() {
    let dir = TempDir::new().unwrap();
    let calls_dir = dir.path().join("calls");
    fs::create_dir(&calls_dir).unwrap();
    write_wav(&calls_dir.join("wren.wav"), &chirp());
    let input = dir.path().join("dawn.wav");
    write_wav(&input, &recording(9));

    let calls = load_reference_calls(&[calls_dir]).unwrap();
    assert_eq!(calls.len(), 1);

    let run_dir = dir.path().join("run");
    let result =
        process_recording(&input, &calls, &run_dir, &options(), debug_epoch(), None).unwrap();
    assert_eq!(result.species, vec!["wren".to_string()]);
    assert!(result.failed_species.is_empty());
    assert_eq!(result.detections, CALL_SECONDS.len());

    let detected = read_detection_file(&run_dir.join("wren").join("3.csv")).unwrap();
    assert_eq!(detected.len(), CALL_SECONDS.len());
    for (ts, second) in detected.iter().zip(CALL_SECONDS) {
        let expected = debug_epoch() + TimeDelta::seconds(second as i64);
        let error_ms = (*ts - expected).num_milliseconds().abs();
        assert!(error_ms < 100, "{} is {error_ms} ms from call", format_timestamp(*ts));
    }
}

#[test]
fn test_detect_then_evaluate() {
    let dir = TempDir::new().unwrap();
    let call_path = dir.path().join("wren.wav");
    write_wav(&call_path, &chirp());
    let input = dir.path().join("dawn.wav");
    write_wav(&input, &recording(9));

    let calls = load_reference_calls(&[call_path]).unwrap();
    let run_dir = dir.path().join("run");
    process_recording(&input, &calls, &run_dir, &options(), debug_epoch(), None).unwrap();

    // the first call doubles as the anchor marker
    let truth_dir = dir.path().join("truth");
    fs::create_dir(&truth_dir).unwrap();
    let truth: String = CALL_SECONDS
        .iter()
        .map(|&s| format!("{}\n", format_timestamp(debug_epoch() + TimeDelta::seconds(s as i64))))
        .collect();
    fs::write(truth_dir.join("wren.csv"), truth).unwrap();

    let params = ScoreParams {
        tolerance: 3.0,
        total_events: 600,
        fp_policy: FalsePositivePolicy::Legacy,
    };
    let roc_dir = dir.path().join("roc");
    let summary = evaluate_run(&run_dir, &truth_dir, &roc_dir, &params).unwrap();

    assert!(summary.failed_species.is_empty());
    let wren = &summary.species[0];
    assert_eq!(wren.rows.len(), 1);
    let row = &wren.rows[0];
    assert_eq!(row.threshold, Threshold::new(3.0));
    assert_eq!(row.counts.true_positives, 3);
    assert_eq!(row.counts.false_negatives, 0);
    assert_eq!(row.counts.false_positives, 1);
    assert_eq!(row.counts.true_negatives, 596);
    assert_eq!(row.true_positive_rate, 1.0);

    let roc = fs::read_to_string(roc_dir.join("wren.csv")).unwrap();
    assert_eq!(roc.lines().count(), 2);
    assert!(roc.lines().nth(1).unwrap().starts_with("wren,3,3,1,596,0,"));
}

#[test]
fn test_recording_shorter_than_window_fails_species_only() {
    let dir = TempDir::new().unwrap();
    let call_path = dir.path().join("wren.wav");
    write_wav(&call_path, &chirp());
    let input = dir.path().join("blip.wav");
    write_wav(&input, &chirp()[..100]);

    let calls = load_reference_calls(&[call_path]).unwrap();
    let result = process_recording(
        &input,
        &calls,
        &dir.path().join("run"),
        &options(),
        debug_epoch(),
        None,
    )
    .unwrap();

    assert!(result.species.is_empty());
    assert_eq!(result.failed_species, vec!["wren".to_string()]);
}

fn stream_options(output_dir: &Path, check_every: u32) -> StreamOptions {
    StreamOptions {
        threshold: Threshold::new(3.0),
        smoothing_window: WINDOW,
        unscaled: false,
        floor: 1e16,
        output_dir: output_dir.to_path_buf(),
        run_start: debug_epoch(),
        cusum: CusumParams::new(5, 2.0),
        check_every,
    }
}

fn write_blocks(dir: &Path, count: usize) -> Vec<PathBuf> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("block{i}.wav"));
            write_wav(&path, &recording(9));
            path
        })
        .collect()
}

#[test]
fn test_stream_blocks_become_days() {
    let dir = TempDir::new().unwrap();
    let call_path = dir.path().join("wren.wav");
    write_wav(&call_path, &chirp());
    let blocks = write_blocks(dir.path(), 5);
    let out = dir.path().join("out");

    let calls = load_reference_calls(&[call_path]).unwrap();
    let summary = run_stream(&blocks, &calls, &stream_options(&out, 5), &AtomicBool::new(false)).unwrap();

    assert_eq!(summary.blocks_processed, 5);
    assert_eq!(summary.blocks_failed, 0);
    assert!(!summary.interrupted);
    assert_eq!(summary.reports.len(), 1);
    assert_eq!(summary.reports[0].species, "wren");
    assert_eq!(summary.reports[0].report.days, 5);
    assert!(matches!(summary.reports[0].report.verdict, ChangeVerdict::NoChange { .. }));

    // every block appends its calls to the same file, one day later each time
    let detected = read_detection_file(&out.join("wren.csv")).unwrap();
    assert_eq!(detected.len(), 5 * CALL_SECONDS.len());
    for (day, chunk) in detected.chunks(CALL_SECONDS.len()).enumerate() {
        let expected = (debug_epoch() + TimeDelta::days(day as i64)).date();
        assert!(chunk.iter().all(|ts| ts.date() == expected), "block {day}");
    }
}

#[test]
fn test_stream_check_runs_every_n_blocks() {
    let dir = TempDir::new().unwrap();
    let call_path = dir.path().join("wren.wav");
    write_wav(&call_path, &chirp());
    let blocks = write_blocks(dir.path(), 3);

    let calls = load_reference_calls(&[call_path]).unwrap();
    let out = dir.path().join("out");

    let summary = run_stream(&blocks, &calls, &stream_options(&out, 2), &AtomicBool::new(false)).unwrap();
    assert_eq!(summary.reports[0].report.days, 2);

    let summary = run_stream(&blocks, &calls, &stream_options(&out, 4), &AtomicBool::new(false)).unwrap();
    assert!(summary.reports.is_empty());
}

#[test]
fn test_stream_write_failure_skips_only_that_species() {
    let dir = TempDir::new().unwrap();
    for species in ["a", "b"] {
        write_wav(&dir.path().join(format!("{species}.wav")), &chirp());
    }
    let blocks = write_blocks(dir.path(), 2);
    let out = dir.path().join("out");
    // a directory where b's stream file should go makes every write for b fail
    fs::create_dir_all(out.join("b.csv")).unwrap();

    let calls = load_reference_calls(&[dir.path().join("a.wav"), dir.path().join("b.wav")]).unwrap();
    let summary = run_stream(&blocks, &calls, &stream_options(&out, 2), &AtomicBool::new(false)).unwrap();

    assert_eq!(summary.blocks_processed, 2);
    assert_eq!(summary.blocks_failed, 0);
    let days: Vec<_> = summary
        .reports
        .iter()
        .map(|r| (r.species.as_str(), r.report.days))
        .collect();
    assert_eq!(days, vec![("a", 2)]);
    assert_eq!(
        read_detection_file(&out.join("a.csv")).unwrap().len(),
        2 * CALL_SECONDS.len()
    );
}

#[test]
fn test_stream_block_shorter_than_window_fails() {
    let dir = TempDir::new().unwrap();
    let call_path = dir.path().join("wren.wav");
    write_wav(&call_path, &chirp());
    let mut blocks = write_blocks(dir.path(), 1);
    let short = dir.path().join("short.wav");
    write_wav(&short, &chirp()[..100]);
    blocks.push(short);

    let calls = load_reference_calls(&[call_path]).unwrap();
    let out = dir.path().join("out");
    let summary = run_stream(&blocks, &calls, &stream_options(&out, 2), &AtomicBool::new(false)).unwrap();

    assert_eq!(summary.blocks_processed, 1);
    assert_eq!(summary.blocks_failed, 1);
    assert_eq!(summary.reports[0].report.days, 1);
}
