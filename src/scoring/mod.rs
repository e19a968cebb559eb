//! Detector accuracy against hand-labelled ground truth.

mod confusion;
mod roc;

pub use confusion::{Clamp, ConfusionCounts, FalsePositivePolicy, Score, ScoreParams, score};
pub use roc::{RocDataset, RocRow, score_table, score_threshold};
