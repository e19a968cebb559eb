//! Daily detection counts.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use std::collections::BTreeMap;

/// Detection counts for consecutive days, oldest first.
///
/// Grows by one entry per day via [`DailyCountSeries::append`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyCountSeries {
    first_day: Option<NaiveDate>,
    counts: Vec<u64>,
}

impl DailyCountSeries {
    /// Empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Series whose first entry belongs to `first_day`.
    pub fn starting(first_day: NaiveDate) -> Self {
        Self {
            first_day: Some(first_day),
            counts: Vec::new(),
        }
    }

    /// Count detections per calendar day.
    ///
    /// Days between the earliest and latest detection with no detections
    /// are filled with zero.
    pub fn from_timestamps<I>(timestamps: I) -> Self
    where
        I: IntoIterator<Item = NaiveDateTime>,
    {
        let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for ts in timestamps {
            *per_day.entry(ts.date()).or_insert(0) += 1;
        }

        let (Some(&first), Some(&last)) = (per_day.keys().next(), per_day.keys().next_back()) else {
            return Self::new();
        };

        let mut series = Self::starting(first);
        let mut day = first;
        while day <= last {
            series.append(per_day.get(&day).copied().unwrap_or(0));
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        series
    }

    /// Record the count for the next day.
    pub fn append(&mut self, count: u64) {
        self.counts.push(count);
    }

    /// Day of the first entry, if known.
    pub fn first_day(&self) -> Option<NaiveDate> {
        self.first_day
    }

    /// Day of the last entry, if known.
    pub fn last_day(&self) -> Option<NaiveDate> {
        let offset = i64::try_from(self.counts.len()).ok()?.checked_sub(1)?;
        self.first_day?.checked_add_signed(TimeDelta::try_days(offset)?)
    }

    /// Counts, oldest first.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Counts as floating point, oldest first.
    #[allow(clippy::cast_precision_loss)]
    pub fn values(&self) -> Vec<f64> {
        self.counts.iter().map(|&c| c as f64).collect()
    }

    /// Number of days recorded.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no day has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
