//! Full configuration validation.
//!
//! Each check pushes a message; all messages are joined into a single
//! `ConfigError`.

mod helpers;

#[cfg(test)]
mod tests;

use crate::schema::{ArcConfig, KNOWN_PLATFORMS};
use arc_common::ConfigError;

use helpers::{validate_nonzero, validate_range_f64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ArcConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_nonzero(
        &mut errors,
        "bridge.request_timeout_ms",
        config.bridge.request_timeout_ms,
    );
    validate_nonzero(
        &mut errors,
        "bridge.ready_timeout_ms",
        config.bridge.ready_timeout_ms,
    );

    if let Some(ref name) = config.platform.override_platform {
        if !KNOWN_PLATFORMS.contains(&name.as_str()) {
            errors.push(format!(
                "platform.override = '{name}' is not one of {KNOWN_PLATFORMS:?}"
            ));
        }
    }

    validate_range_f64(&mut errors, "zoom.step", config.zoom.step, f64::MIN_POSITIVE, 1.0);
    validate_range_f64(&mut errors, "zoom.min", config.zoom.min, 0.01, 10.0);
    validate_range_f64(&mut errors, "zoom.max", config.zoom.max, 0.01, 10.0);
    if config.zoom.min >= config.zoom.max {
        errors.push(format!(
            "zoom.min ({}) must be below zoom.max ({})",
            config.zoom.min, config.zoom.max
        ));
    }

    if config.overlay.search_url.trim().is_empty() {
        errors.push("overlay.search_url must not be empty".into());
    }

    match config.logging.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        other => errors.push(format!("logging.level = '{other}' is not a tracing level")),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
