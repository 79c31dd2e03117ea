// Configuration validation

use crate::{ConfigError, Result};

/// Trait for validating configuration
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Configuration validator with rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate that a value is not empty
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::invalid(field, "cannot be empty"));
        }
        Ok(())
    }

    /// Validate that a number is within an inclusive range
    pub fn in_range<T: PartialOrd + std::fmt::Display>(
        value: T,
        min: T,
        max: T,
        field: &str,
    ) -> Result<()> {
        if value < min || value > max {
            return Err(ConfigError::invalid(
                field,
                format!("must be between {} and {}, got {}", min, max, value),
            ));
        }
        Ok(())
    }

    /// Validate a WebSocket origin: `ws://` or `wss://` followed by a host
    pub fn is_ws_url(value: &str, field: &str) -> Result<()> {
        let host = value
            .strip_prefix("ws://")
            .or_else(|| value.strip_prefix("wss://"));

        match host {
            Some(rest) if !rest.is_empty() && !rest.starts_with('/') => Ok(()),
            _ => Err(ConfigError::invalid(
                field,
                format!("must be a ws:// or wss:// URL, got `{}`", value),
            )),
        }
    }

    /// Validate that a path fragment has no query or fragment markers
    pub fn is_path(value: &str, field: &str) -> Result<()> {
        if value.contains(['?', '#', ' ']) {
            return Err(ConfigError::invalid(field, "must be a plain URL path"));
        }
        Ok(())
    }
}
