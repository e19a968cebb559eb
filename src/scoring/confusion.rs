//! Confusion-matrix scoring of detections against ground truth.

use crate::error::{Error, Result};
use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

/// How false positives are counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FalsePositivePolicy {
    /// `detections - true positives + 1`, matching historical ROC datasets.
    #[default]
    Legacy,
    /// `detections - true positives`.
    Corrected,
}

/// Run-wide scoring parameters.
#[derive(Debug, Clone, Copy)]
pub struct ScoreParams {
    /// Width of the match window around each ground-truth event, in seconds.
    pub tolerance: f64,
    /// Total number of true events across the whole evaluation corpus.
    pub total_events: u32,
    /// False-positive counting rule.
    pub fp_policy: FalsePositivePolicy,
}

impl ScoreParams {
    /// Reject parameters that cannot produce a meaningful score.
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(Error::InvalidParameter {
                message: format!("tolerance must be a positive number of seconds, got {}", self.tolerance),
            });
        }
        if self.total_events == 0 {
            return Err(Error::InvalidParameter {
                message: "total events must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    fn half_window(&self) -> TimeDelta {
        #[allow(clippy::cast_possible_truncation)]
        let micros = (self.tolerance * 1e6 / 2.0).round() as i64;
        TimeDelta::microseconds(micros)
    }
}

/// True/false positive/negative counts for one species at one threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionCounts {
    /// Ground-truth events with a detection inside their window.
    pub true_positives: u64,
    /// Detections not accounted for by a true positive.
    pub false_positives: u64,
    /// Remaining events of the corpus neither detected nor missed.
    pub true_negatives: u64,
    /// Ground-truth events with no detection inside their window.
    pub false_negatives: u64,
}

impl ConfusionCounts {
    /// `TP / (TP + FN)`, or `None` when there were no ground-truth events.
    #[allow(clippy::cast_precision_loss)]
    pub fn true_positive_rate(&self) -> Option<f64> {
        let denominator = self.true_positives + self.false_negatives;
        (denominator > 0).then(|| self.true_positives as f64 / denominator as f64)
    }

    /// `FP / (FP + TN)`, or `None` when both are zero.
    #[allow(clippy::cast_precision_loss)]
    pub fn false_alarm_rate(&self) -> Option<f64> {
        let denominator = self.false_positives + self.true_negatives;
        (denominator > 0).then(|| self.false_positives as f64 / denominator as f64)
    }
}

/// A count that came out negative and was clamped to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clamp {
    /// Raw true-negative count before clamping.
    TrueNegatives(i64),
    /// Raw false-positive count before clamping.
    FalsePositives(i64),
}

/// Result of scoring one detection sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    /// Clamped counts.
    pub counts: ConfusionCounts,
    /// Counts that had to be clamped. Non-empty means the total-events or
    /// tolerance setting does not fit this corpus.
    pub clamps: Vec<Clamp>,
}

/// Score `detected` against `truth`.
///
/// The first entry of each sequence is a reference marker: the two clocks
/// are aligned on it and it is then excluded. A ground-truth event counts
/// as a true positive when any detection lies strictly within
/// `tolerance / 2` of it; detections are not consumed, so one detection can
/// match several nearby events.
///
/// An empty `detected` sequence (or one holding only the marker) is the
/// degenerate case: every event is a false negative.
pub fn score(detected: &[NaiveDateTime], truth: &[NaiveDateTime], params: &ScoreParams) -> Result<Score> {
    params.validate()?;

    let Some((&truth_anchor, events)) = truth.split_first() else {
        return Err(Error::InvalidParameter {
            message: "ground truth has no reference marker".to_string(),
        });
    };

    let total = i64::from(params.total_events);
    let event_count = count(events.len());

    let (detection_anchor, detections) = match detected.split_first() {
        Some((&anchor, rest)) if !rest.is_empty() => (anchor, rest),
        _ => {
            let (true_negatives, clamps) = clamp_true_negatives(total - event_count, Vec::new());
            return Ok(Score {
                counts: ConfusionCounts {
                    true_positives: 0,
                    false_positives: 0,
                    true_negatives,
                    false_negatives: to_count(event_count),
                },
                clamps,
            });
        }
    };

    let half = params.half_window();
    let relative: Vec<TimeDelta> = detections.iter().map(|&d| d - detection_anchor).collect();

    let mut true_positives = 0i64;
    for &event in events {
        let centre = event - truth_anchor;
        let low = centre - half;
        let high = centre + half;
        let first_after_low = relative.partition_point(|&d| d <= low);
        if relative.get(first_after_low).is_some_and(|&d| d < high) {
            true_positives += 1;
        }
    }
    let false_negatives = event_count - true_positives;

    let offset = match params.fp_policy {
        FalsePositivePolicy::Legacy => 1,
        FalsePositivePolicy::Corrected => 0,
    };
    let raw_false_positives = count(detections.len()) - true_positives + offset;
    let raw_true_negatives = total - true_positives - raw_false_positives - false_negatives;

    let (true_negatives, mut clamps) = clamp_true_negatives(raw_true_negatives, Vec::new());
    let false_positives = if raw_false_positives < 0 {
        clamps.push(Clamp::FalsePositives(raw_false_positives));
        0
    } else {
        to_count(raw_false_positives)
    };

    Ok(Score {
        counts: ConfusionCounts {
            true_positives: to_count(true_positives),
            false_positives,
            true_negatives,
            false_negatives: to_count(false_negatives),
        },
        clamps,
    })
}

fn clamp_true_negatives(raw: i64, mut clamps: Vec<Clamp>) -> (u64, Vec<Clamp>) {
    if raw < 0 {
        clamps.push(Clamp::TrueNegatives(raw));
        (0, clamps)
    } else {
        (to_count(raw), clamps)
    }
}

fn count(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
