//! Per-threshold ROC rows for one species.

use crate::detect::{DetectionTable, Threshold};
use crate::error::{Error, Result};
use crate::scoring::{Clamp, ConfusionCounts, ScoreParams, score};
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{error, warn};

/// One row of a species' ROC dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RocRow {
    /// Species identifier.
    pub species: String,
    /// Threshold the detections were produced at.
    pub threshold: Threshold,
    /// Confusion-matrix counts.
    #[serde(flatten)]
    pub counts: ConfusionCounts,
    /// `FP / (FP + TN)`.
    pub false_alarm_rate: f64,
    /// `TP / (TP + FN)`.
    pub true_positive_rate: f64,
}

/// All rows scored for one species, ordered by threshold.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RocDataset {
    /// Species identifier.
    pub species: String,
    /// Successfully scored thresholds.
    pub rows: Vec<RocRow>,
    /// Thresholds that could not be scored.
    pub failed: Vec<Threshold>,
}

/// Score one threshold's detections and derive its rates.
///
/// Clamped counts are logged as warnings; a zero rate denominator is a
/// data-quality error.
pub fn score_threshold(
    species: &str,
    threshold: Threshold,
    detected: &[NaiveDateTime],
    truth: &[NaiveDateTime],
    params: &ScoreParams,
) -> Result<RocRow> {
    let scored = score(detected, truth, params)?;

    for clamp in &scored.clamps {
        match clamp {
            Clamp::TrueNegatives(raw) => warn!(
                "{species} @ {threshold}: impossible result, true negatives was {raw}; clamped to 0 (check total events / tolerance)"
            ),
            Clamp::FalsePositives(raw) => warn!(
                "{species} @ {threshold}: impossible result, false positives was {raw}; clamped to 0 (check total events / tolerance)"
            ),
        }
    }

    let counts = scored.counts;
    let undefined = |rate| Error::UndefinedRate {
        rate,
        species: species.to_string(),
        threshold: threshold.to_string(),
    };
    let true_positive_rate = counts.true_positive_rate().ok_or_else(|| undefined("TPR"))?;
    let false_alarm_rate = counts.false_alarm_rate().ok_or_else(|| undefined("FAR"))?;

    Ok(RocRow {
        species: species.to_string(),
        threshold,
        counts,
        false_alarm_rate,
        true_positive_rate,
    })
}

/// Score every threshold of `table` against `truth`.
///
/// A threshold that fails to score is logged and recorded in
/// [`RocDataset::failed`]; the remaining thresholds are still scored.
pub fn score_table(table: &DetectionTable, truth: &[NaiveDateTime], params: &ScoreParams) -> RocDataset {
    let species = table.species();
    let mut dataset = RocDataset {
        species: species.to_string(),
        ..RocDataset::default()
    };

    for (threshold, detected) in table.iter() {
        match score_threshold(species, threshold, detected, truth, params) {
            Ok(row) => dataset.rows.push(row),
            Err(e) => {
                error!("{species} @ {threshold}: {e}");
                dataset.failed.push(threshold);
            }
        }
    }

    dataset
}
