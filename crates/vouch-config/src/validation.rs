// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as positive durations and non-empty paths.

use thiserror::Error;

use crate::model::VouchConfig;

/// A configuration error: either a parse failure from Figment or a
/// semantic validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML parse or type error.
    #[error("config parse error: {0}")]
    Parse(String),

    /// Semantic validation error.
    #[error("invalid config: {message}")]
    Validation { message: String },
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &VouchConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "service.log_level must be one of trace/debug/info/warn/error, got `{}`",
                config.service.log_level
            ),
        });
    }

    if config.gateway.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    }

    if config.gateway.port == 0 {
        errors.push(ConfigError::Validation {
            message: "gateway.port must not be 0".to_string(),
        });
    }

    if let Some(token) = &config.telegram.bot_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "telegram.bot_token must not be empty when set".to_string(),
        });
    }

    if config.review.ttl_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "review.ttl_secs must be positive".to_string(),
        });
    }

    if config.review.sweep_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "review.sweep_interval_secs must be positive".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
