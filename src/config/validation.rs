//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("{0} must be greater than zero")]
    ZeroLimit(&'static str),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.trim().is_empty() {
        errors.push(ValidationError::MissingServerName);
    }

    let limits = &config.limits;
    for (name, value) in [
        ("limits.nick_len", limits.nick_len as u64),
        ("limits.max_frame_len", limits.max_frame_len as u64),
        ("limits.sendq", limits.sendq as u64),
        ("limits.read_timeout_secs", limits.read_timeout_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroLimit(name));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
