//! Timestamp formatting and parsing.
//!
//! Every persisted timestamp uses ISO-8601 with microseconds
//! (`2000-01-01T00:00:10.200000`) and no time zone.

use crate::constants::TIMESTAMP_FORMAT;
use crate::constants::detection::DEBUG_EPOCH;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Alternate layout written by spreadsheet tools (space instead of `T`).
const SPACED_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Layout accepted when parsing; the fraction is optional.
const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Format with microsecond precision.
pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a persisted timestamp.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, PARSE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, SPACED_FORMAT))
}

/// Fixed base time used instead of the wall clock in debug runs.
pub fn debug_epoch() -> NaiveDateTime {
    let (year, month, day) = DEBUG_EPOCH;
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::MIN)
}
