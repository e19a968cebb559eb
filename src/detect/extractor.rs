//! Turning an envelope into timestamped detections.

use crate::detect::{DetectionTable, Envelope, Threshold, ThresholdSweep, find_peaks};
use crate::error::{Error, Result};
use chrono::{NaiveDateTime, TimeDelta};
use tracing::debug;

/// How decision levels and timestamps are derived for one detection pass.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Sample rate of the analysed segment in Hz. Also the minimum peak spacing.
    pub sample_rate: u32,
    /// Wall-clock time of the first sample.
    pub run_start: NaiveDateTime,
    /// Whole days added to every timestamp.
    pub day_offset: u32,
    /// Use `k * std` instead of `mean + k * std` as the decision level.
    pub unscaled: bool,
    /// Minimum decision level, when the floor policy is active.
    pub floor: Option<f64>,
}

/// Decision level for threshold `k` on `envelope`.
pub fn decision_level(envelope: &Envelope, threshold: Threshold, unscaled: bool, floor: Option<f64>) -> f64 {
    let spread = threshold.value() * envelope.std_dev();
    let level = if unscaled {
        spread
    } else {
        envelope.mean() + spread
    };

    match floor {
        Some(min) if level < min => min,
        _ => level,
    }
}

/// Absolute time of sample `index`, rounded to the microsecond.
pub fn sample_to_timestamp(
    index: usize,
    sample_rate: u32,
    run_start: NaiveDateTime,
    day_offset: u32,
) -> Result<NaiveDateTime> {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let micros = (index as f64 * 1e6 / f64::from(sample_rate)).round() as i64;

    let elapsed = TimeDelta::microseconds(micros);
    let days = TimeDelta::try_days(i64::from(day_offset)).ok_or(Error::TimestampOverflow { index })?;

    run_start
        .checked_add_signed(elapsed)
        .and_then(|t| t.checked_add_signed(days))
        .ok_or(Error::TimestampOverflow { index })
}

/// Run one peak search per threshold in `sweep` and collect the timestamps.
///
/// Peaks closer than one second (`sample_rate` samples) are merged into the
/// tallest. A threshold with no peaks yields an empty column.
pub fn extract(
    species: &str,
    envelope: &Envelope,
    sweep: &ThresholdSweep,
    options: &ExtractOptions,
) -> Result<DetectionTable> {
    if options.sample_rate == 0 {
        return Err(Error::InvalidParameter {
            message: "sample rate must be positive".to_string(),
        });
    }

    let min_spacing = options.sample_rate as usize;
    let mut table = DetectionTable::new(species);

    for threshold in sweep.iter() {
        let level = decision_level(envelope, threshold, options.unscaled, options.floor);
        let peaks = find_peaks(envelope.values(), level, min_spacing);
        debug!(
            "{species}: threshold {threshold} -> level {level:.4e}, {} peak(s)",
            peaks.len()
        );

        let timestamps = peaks
            .into_iter()
            .map(|index| {
                sample_to_timestamp(index, options.sample_rate, options.run_start, options.day_offset)
            })
            .collect::<Result<Vec<_>>>()?;

        table.insert(threshold, timestamps);
    }

    Ok(table)
}
