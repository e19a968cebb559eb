//! JSON envelope for machine-readable CLI output.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// Current spec version for JSON envelope.
pub const SPEC_VERSION: &str = "1.0";

/// JSON envelope wrapping a command result.
#[derive(Debug, Serialize)]
pub struct JsonEnvelope<T> {
    /// Envelope format version.
    pub spec_version: String,
    /// Time the result was produced.
    pub timestamp: DateTime<Utc>,
    /// Kind of result in `payload`.
    pub result_type: ResultType,
    /// Result payload.
    pub payload: T,
}

impl<T: Serialize> JsonEnvelope<T> {
    /// Create a new envelope with the current timestamp.
    pub fn new(result_type: ResultType, payload: T) -> Self {
        Self {
            spec_version: SPEC_VERSION.to_string(),
            timestamp: Utc::now(),
            result_type,
            payload,
        }
    }
}

/// Result type discriminator for result payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    /// Batch detection summary.
    Detection,
    /// ROC evaluation summary.
    Evaluation,
    /// Streaming run summary.
    Stream,
    /// Change monitor verdict.
    Monitor,
}

/// Write one enveloped result as a JSON line.
pub fn write_json_result<T: Serialize>(
    out: &mut impl Write,
    result_type: ResultType,
    payload: &T,
) -> Result<()> {
    let envelope = JsonEnvelope::new(result_type, payload);
    serde_json::to_writer(&mut *out, &envelope).map_err(|source| Error::JsonWrite { source })?;
    writeln!(out)?;
    Ok(())
}

/// Emit one enveloped result on stdout.
pub fn emit_json_result<T: Serialize>(result_type: ResultType, payload: &T) -> Result<()> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    write_json_result(&mut lock, result_type, payload)
}
