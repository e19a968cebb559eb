//! Change monitor scenarios and properties.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use birdcorr::Error;
use birdcorr::monitor::{ChangeVerdict, CusumParams, DailyCountSeries, assess, detect_change};

#[test]
fn test_single_spike_is_an_increase() {
    let series = [5.0, 5.0, 5.0, 5.0, 5.0, 20.0];
    let verdict = detect_change(&series, &CusumParams::new(5, 10.0)).unwrap();

    assert!(verdict.changed());
    assert_eq!(verdict.reason(), "increase");
    let stats = verdict.statistics().unwrap();
    assert_eq!(stats.baseline, 7.5);
    assert_eq!(stats.positive, 12.5);
}

#[test]
fn test_short_history_is_insufficient() {
    for series in [[0.0, 0.0, 0.0], [100.0, 0.0, 100.0], [1.0, 2.0, 3.0]] {
        let verdict = detect_change(&series, &CusumParams::new(5, 0.0)).unwrap();
        assert!(!verdict.changed());
        assert_eq!(verdict.reason(), "insufficient history");
        assert!(verdict.statistics().is_none());
    }
}

#[test]
fn test_raising_threshold_never_creates_a_change() {
    let series_set: [&[f64]; 4] = [
        &[5.0, 5.0, 5.0, 5.0, 5.0, 20.0],
        &[10.0, 10.0, 10.0, 2.0, 1.0, 0.0],
        &[3.0, 4.0, 3.0, 4.0, 3.0, 4.0, 3.0],
        &[0.0, 0.0, 50.0, 0.0, 0.0, 0.0],
    ];
    let thresholds = [0.0, 1.0, 2.5, 5.0, 10.0, 20.0, 50.0, 100.0];

    for series in series_set {
        let mut was_changed = true;
        for threshold in thresholds {
            let changed = detect_change(series, &CusumParams::new(4, threshold))
                .unwrap()
                .changed();
            assert!(was_changed || !changed, "{series:?} flipped to changed at {threshold}");
            was_changed = changed;
        }
    }
}

#[test]
fn test_increase_takes_precedence() {
    // lags 1..3 see 10, 30 and 0 against a baseline of 10
    let series = [10.0, 10.0, 10.0, 10.0, 0.0, 0.0, 30.0, 10.0];
    let mut params = CusumParams::new(4, 1.0);
    params.look_back_mean = Some(8);

    let verdict = detect_change(&series, &params).unwrap();
    let stats = verdict.statistics().unwrap();
    assert!(stats.positive > 1.0 && stats.negative > 1.0);
    assert!(matches!(verdict, ChangeVerdict::Increase { .. }));
}

#[test]
fn test_weights_must_cover_look_back() {
    let mut params = CusumParams::new(5, 10.0);
    params.weights = Some(vec![0.0; 3]);

    assert!(matches!(
        detect_change(&[5.0; 10], &params),
        Err(Error::InvalidParameter { .. })
    ));

    params.weights = Some(vec![0.0; 5]);
    assert!(detect_change(&[5.0; 10], &params).is_ok());
}

#[test]
fn test_assess_daily_series() {
    let mut series = DailyCountSeries::new();
    for count in [12, 11, 12, 13, 12, 12, 1, 0, 2] {
        series.append(count);
    }

    let report = assess(&series, &CusumParams::new(4, 5.0), None).unwrap();
    assert_eq!(report.days, 9);
    assert_eq!(report.verdict.reason(), "decrease");
}
