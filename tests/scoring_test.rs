//! Confusion-matrix scoring scenarios and properties.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use birdcorr::Error;
use birdcorr::detect::Threshold;
use birdcorr::scoring::{Clamp, FalsePositivePolicy, ScoreParams, score, score_threshold};
use birdcorr::utils::time::debug_epoch;
use chrono::{NaiveDateTime, TimeDelta};

const PARAMS: ScoreParams = ScoreParams {
    tolerance: 3.0,
    total_events: 600,
    fp_policy: FalsePositivePolicy::Legacy,
};

fn at_ms(ms: i64) -> NaiveDateTime {
    debug_epoch() + TimeDelta::milliseconds(ms)
}

fn anchored(offsets_ms: &[i64]) -> Vec<NaiveDateTime> {
    std::iter::once(0)
        .chain(offsets_ms.iter().copied())
        .map(at_ms)
        .collect()
}

#[test]
fn test_two_of_three_events_matched() {
    let truth = anchored(&[10_000, 20_000, 30_000]);
    let detected = anchored(&[10_200, 19_800]);

    let row = score_threshold("wren", Threshold::new(3.0), &detected, &truth, &PARAMS).unwrap();
    let c = row.counts;
    assert_eq!(c.true_positives, 2);
    assert_eq!(c.false_negatives, 1);
    assert_eq!(c.false_positives, 1);
    assert_eq!(c.true_negatives, 596);
    assert!((row.true_positive_rate - 2.0 / 3.0).abs() < 1e-12);
    assert!((row.false_alarm_rate - 1.0 / 597.0).abs() < 1e-12);
}

#[test]
fn test_corrected_policy_drops_the_offset() {
    let truth = anchored(&[10_000, 20_000, 30_000]);
    let detected = anchored(&[10_200, 19_800]);
    let params = ScoreParams {
        fp_policy: FalsePositivePolicy::Corrected,
        ..PARAMS
    };

    let counts = score(&detected, &truth, &params).unwrap().counts;
    assert_eq!(counts.false_positives, 0);
    assert_eq!(counts.true_negatives, 597);
}

#[test]
fn test_empty_detections_are_all_misses() {
    for g in [0_usize, 1, 4] {
        let offsets: Vec<i64> = (1..=g as i64).map(|i| i * 10_000).collect();
        let truth = anchored(&offsets);

        for detected in [Vec::new(), anchored(&[])] {
            let counts = score(&detected, &truth, &PARAMS).unwrap().counts;
            assert_eq!(counts.true_positives, 0);
            assert_eq!(counts.false_positives, 0);
            assert_eq!(counts.false_negatives, g as u64);
            assert_eq!(counts.true_negatives, 600 - g as u64);
        }
    }
}

#[test]
fn test_impossible_counts_are_clamped() {
    let truth = anchored(&[10_000]);
    let detected = anchored(&[50_000, 60_000, 70_000, 80_000]);
    let params = ScoreParams {
        total_events: 2,
        ..PARAMS
    };

    let scored = score(&detected, &truth, &params).unwrap();
    assert_eq!(scored.counts.true_negatives, 0);
    assert!(scored
        .clamps
        .iter()
        .any(|c| matches!(c, Clamp::TrueNegatives(raw) if *raw < 0)));
}

#[test]
fn test_rates_stay_in_unit_interval() {
    let truth = anchored(&[5_000, 15_000, 25_000, 35_000, 45_000]);
    let cases: [&[i64]; 4] = [
        &[5_100],
        &[5_100, 15_100, 25_100, 35_100, 45_100],
        &[1_000, 2_000, 3_000, 4_000, 6_000, 7_000, 8_000],
        &[44_000, 46_000],
    ];

    for offsets in cases {
        let detected = anchored(offsets);
        let row = score_threshold("wren", Threshold::new(1.0), &detected, &truth, &PARAMS).unwrap();
        assert!((0.0..=1.0).contains(&row.true_positive_rate));
        assert!((0.0..=1.0).contains(&row.false_alarm_rate));
    }
}

#[test]
fn test_common_time_shift_does_not_change_counts() {
    let truth = anchored(&[10_000, 20_000, 30_000]);
    let detected = anchored(&[10_200, 19_800, 42_000]);
    let baseline = score(&detected, &truth, &PARAMS).unwrap();

    for shift_ms in [1, 86_400_000, -3_600_000] {
        let shift = TimeDelta::milliseconds(shift_ms);
        let moved_truth: Vec<_> = truth.iter().map(|t| *t + shift).collect();
        let moved_detected: Vec<_> = detected.iter().map(|t| *t + shift).collect();
        assert_eq!(score(&moved_detected, &moved_truth, &PARAMS).unwrap(), baseline);
    }
}

#[test]
fn test_detector_clock_offset_removed_by_anchor() {
    let truth = anchored(&[10_000, 20_000]);
    // detector clock started a day earlier than the labeller's
    let detected: Vec<_> = anchored(&[10_100, 20_100])
        .into_iter()
        .map(|t| t - TimeDelta::days(1))
        .collect();

    let counts = score(&detected, &truth, &PARAMS).unwrap().counts;
    assert_eq!(counts.true_positives, 2);
}

#[test]
fn test_window_edges_are_exclusive() {
    let truth = anchored(&[10_000]);
    let on_edge = anchored(&[11_500]);
    let inside = anchored(&[11_499]);

    assert_eq!(score(&on_edge, &truth, &PARAMS).unwrap().counts.true_positives, 0);
    assert_eq!(score(&inside, &truth, &PARAMS).unwrap().counts.true_positives, 1);
}

#[test]
fn test_invalid_parameters_rejected() {
    let truth = anchored(&[10_000]);
    for params in [
        ScoreParams { tolerance: 0.0, ..PARAMS },
        ScoreParams { tolerance: -1.0, ..PARAMS },
        ScoreParams { total_events: 0, ..PARAMS },
    ] {
        assert!(matches!(
            score(&truth, &truth, &params),
            Err(Error::InvalidParameter { .. })
        ));
    }
}

#[test]
fn test_zero_denominator_is_reported() {
    // only the anchor: no events, so TPR is undefined
    let truth = anchored(&[]);
    let err = score_threshold("wren", Threshold::new(3.0), &[], &truth, &PARAMS).unwrap_err();
    assert!(matches!(err, Error::UndefinedRate { rate: "TPR", .. }));
}
