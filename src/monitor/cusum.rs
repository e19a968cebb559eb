//! CUSUM test for a shift in the mean daily detection count.

use crate::dsp::mean;
use crate::error::{Error, Result};
use serde::Serialize;

/// Parameters of the CUSUM test.
#[derive(Debug, Clone, PartialEq)]
pub struct CusumParams {
    /// Number of most recent days to inspect; also the minimum history.
    pub look_back: usize,
    /// Decision threshold on each cumulative sum.
    pub threshold: f64,
    /// Optional per-lag dead band, indexed by lag; at least `look_back` long.
    pub weights: Option<Vec<f64>>,
    /// When set, the baseline is the mean of the window from this many days
    /// back up to (excluding) the `look_back` most recent days.
    pub look_back_mean: Option<usize>,
}

impl CusumParams {
    /// Parameters with no weights and an all-history baseline.
    pub fn new(look_back: usize, threshold: f64) -> Self {
        Self {
            look_back,
            threshold,
            weights: None,
            look_back_mean: None,
        }
    }

    /// Reject inconsistent settings.
    pub fn validate(&self) -> Result<()> {
        if self.look_back == 0 {
            return Err(Error::InvalidParameter {
                message: "look_back must be at least 1".to_string(),
            });
        }
        if !self.threshold.is_finite() {
            return Err(Error::InvalidParameter {
                message: format!("CUSUM threshold must be finite, got {}", self.threshold),
            });
        }
        if let Some(weights) = &self.weights
            && weights.len() < self.look_back
        {
            return Err(Error::InvalidParameter {
                message: format!(
                    "weights must have at least look_back ({}) entries, got {}",
                    self.look_back,
                    weights.len()
                ),
            });
        }
        if let Some(window) = self.look_back_mean
            && window <= self.look_back
        {
            return Err(Error::InvalidParameter {
                message: format!(
                    "look_back_mean ({window}) must be greater than look_back ({})",
                    self.look_back
                ),
            });
        }
        Ok(())
    }
}

/// Cumulative sums computed by one test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CusumStatistics {
    /// Baseline mean the recent days were compared to.
    pub baseline: f64,
    /// Sum of deviations above the baseline.
    pub positive: f64,
    /// Sum of deviations below the baseline.
    pub negative: f64,
}

/// Outcome of a change test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum ChangeVerdict {
    /// Not enough days to decide.
    InsufficientHistory {
        /// Days available.
        available: usize,
        /// Days required.
        required: usize,
    },
    /// Neither sum crossed the threshold.
    NoChange {
        /// Computed sums.
        statistics: CusumStatistics,
    },
    /// The positive sum crossed the threshold.
    Increase {
        /// Computed sums.
        statistics: CusumStatistics,
    },
    /// The negative sum crossed the threshold.
    Decrease {
        /// Computed sums.
        statistics: CusumStatistics,
    },
}

impl ChangeVerdict {
    /// Whether a change was detected.
    pub fn changed(&self) -> bool {
        matches!(self, Self::Increase { .. } | Self::Decrease { .. })
    }

    /// Short human-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InsufficientHistory { .. } => "insufficient history",
            Self::NoChange { .. } => "no change",
            Self::Increase { .. } => "increase",
            Self::Decrease { .. } => "decrease",
        }
    }

    /// Sums behind the verdict, when they were computed.
    pub fn statistics(&self) -> Option<CusumStatistics> {
        match self {
            Self::InsufficientHistory { .. } => None,
            Self::NoChange { statistics }
            | Self::Increase { statistics }
            | Self::Decrease { statistics } => Some(*statistics),
        }
    }
}

/// Test `series` (oldest first) for a shift in its mean.
///
/// Lags `1..look_back` are inspected (lag 1 is the most recent day). A day
/// counts toward the positive sum when it exceeds `baseline + w[lag]` and
/// toward the negative sum when it falls below `baseline - w[lag]`, adding
/// its absolute deviation from the baseline. An increase takes precedence
/// over a decrease when both sums exceed the threshold.
pub fn detect_change(series: &[f64], params: &CusumParams) -> Result<ChangeVerdict> {
    params.validate()?;

    let len = series.len();
    if len < params.look_back {
        return Ok(ChangeVerdict::InsufficientHistory {
            available: len,
            required: params.look_back,
        });
    }

    let baseline = match params.look_back_mean {
        Some(window) => {
            let start = len.saturating_sub(window);
            let end = len - params.look_back;
            if start >= end {
                return Ok(ChangeVerdict::InsufficientHistory {
                    available: len,
                    required: window,
                });
            }
            mean(&series[start..end])
        }
        None => mean(series),
    };

    let mut positive = 0.0;
    let mut negative = 0.0;
    for lag in 1..params.look_back {
        let value = series[len - lag];
        let band = params.weights.as_ref().map_or(0.0, |w| w[lag]);
        if value > baseline + band {
            positive += (value - baseline).abs();
        }
        if value < baseline - band {
            negative += (value - baseline).abs();
        }
    }

    let statistics = CusumStatistics {
        baseline,
        positive,
        negative,
    };

    Ok(if positive > params.threshold {
        ChangeVerdict::Increase { statistics }
    } else if negative > params.threshold {
        ChangeVerdict::Decrease { statistics }
    } else {
        ChangeVerdict::NoChange { statistics }
    })
}
