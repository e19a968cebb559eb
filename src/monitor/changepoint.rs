//! Plug-in point for changepoint estimators.

use serde::Serialize;

/// Where a series most likely changed, and how sure the estimator is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChangepointEstimate {
    /// Index into the series of the first day after the change.
    pub index: usize,
    /// Estimator-specific confidence in `[0, 1]`.
    pub confidence: f64,
}

/// An external estimator that locates a changepoint in a daily series.
///
/// The change monitor never requires one; it is consulted only when supplied.
pub trait ChangepointEstimator {
    /// Estimate the changepoint of `series`, or `None` if there is none.
    fn estimate_changepoint(&self, series: &[f64]) -> Option<ChangepointEstimate>;
}
