//! Historical change monitoring of daily detection rates.
//!
//! A [`DailyCountSeries`] accumulates one count per day; [`detect_change`]
//! runs a CUSUM test over its most recent days against a baseline mean.

mod changepoint;
mod cusum;
mod series;

pub use changepoint::{ChangepointEstimate, ChangepointEstimator};
pub use cusum::{ChangeVerdict, CusumParams, CusumStatistics, detect_change};
pub use series::DailyCountSeries;

use crate::error::Result;
use serde::Serialize;
use tracing::debug;

/// Verdict for one series plus the optional changepoint estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorReport {
    /// Number of days inspected.
    pub days: usize,
    /// CUSUM verdict.
    pub verdict: ChangeVerdict,
    /// Estimate from the supplied estimator, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changepoint: Option<ChangepointEstimate>,
}

/// Run the change test on `series`, consulting `estimator` when a change is found.
pub fn assess(
    series: &DailyCountSeries,
    params: &CusumParams,
    estimator: Option<&dyn ChangepointEstimator>,
) -> Result<MonitorReport> {
    let values = series.values();
    let verdict = detect_change(&values, params)?;
    debug!(
        days = values.len(),
        reason = verdict.reason(),
        "CUSUM evaluated"
    );

    let changepoint = match estimator {
        Some(estimator) if verdict.changed() => estimator.estimate_changepoint(&values),
        _ => None,
    };

    Ok(MonitorReport {
        days: values.len(),
        verdict,
        changepoint,
    })
}
