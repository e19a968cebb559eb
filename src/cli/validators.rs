//! CLI argument validators.
//!
//! Shared validation functions for CLI argument parsing.

use crate::config::SweepConfig;

/// Parse a finite float.
pub fn parse_finite_float(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !value.is_finite() {
        return Err(format!("value must be finite, got {value}"));
    }

    Ok(value)
}

/// Parse a strictly positive float (e.g. a tolerance in seconds).
pub fn parse_positive_float(s: &str) -> Result<f64, String> {
    let value = parse_finite_float(s)?;

    if value <= 0.0 {
        return Err(format!("value must be greater than 0, got {value}"));
    }

    Ok(value)
}

/// Parse a threshold sweep written as `start:stop:step` (stop exclusive).
pub fn parse_sweep(s: &str) -> Result<SweepConfig, String> {
    let parts: Vec<&str> = s.split(':').collect();
    let [start, stop, step] = parts.as_slice() else {
        return Err(format!("'{s}' is not a sweep; expected start:stop:step"));
    };

    let sweep = SweepConfig {
        start: parse_finite_float(start)?,
        stop: parse_finite_float(stop)?,
        step: parse_positive_float(step)?,
    };

    if sweep.stop <= sweep.start {
        return Err(format!(
            "sweep stop ({}) must be greater than start ({})",
            sweep.stop, sweep.start
        ));
    }

    Ok(sweep)
}
