//! Configuration validation.

use crate::config::Config;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_detection(config)?;
    validate_scoring(config)?;
    validate_monitor(config)?;
    Ok(())
}

fn invalid(message: String) -> Error {
    Error::ConfigValidation { message }
}

/// Validate detection settings.
fn validate_detection(config: &Config) -> Result<()> {
    let detection = &config.detection;

    if detection.smoothing_window == 0 {
        return Err(invalid("smoothing_window must be at least 1".to_string()));
    }

    if detection.apply_floor && !detection.floor.is_finite() {
        return Err(invalid(format!("floor must be finite, got {}", detection.floor)));
    }

    detection
        .threshold_sweep()
        .map(|_| ())
        .map_err(|e| invalid(format!("detection thresholds: {e}")))
}

/// Validate scoring settings.
fn validate_scoring(config: &Config) -> Result<()> {
    config
        .scoring
        .params()
        .validate()
        .map_err(|e| invalid(format!("scoring: {e}")))
}

/// Validate change monitor settings.
fn validate_monitor(config: &Config) -> Result<()> {
    if config.monitor.check_every == 0 {
        return Err(invalid("check_every must be at least 1".to_string()));
    }

    config
        .monitor
        .params()
        .validate()
        .map_err(|e| invalid(format!("monitor: {e}")))
}
