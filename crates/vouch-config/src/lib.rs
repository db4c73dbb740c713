// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Vouch approval gateway.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides via the `VOUCH_` prefix.
//!
//! # Usage
//!
//! ```no_run
//! use vouch_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("gateway port: {}", config.gateway.port);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::VouchConfig;
pub use validation::{validate_config, ConfigError};

/// Load configuration from the XDG hierarchy and validate it.
///
/// This is the high-level entry point that:
/// 1. Loads config from TOML files + env vars via Figment
/// 2. On success: runs post-deserialization validation
/// 3. On Figment error: converts to a `ConfigError::Parse`
pub fn load_and_validate() -> Result<VouchConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError::Parse(err.to_string())]),
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<VouchConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError::Parse(err.to_string())]),
    }
}

/// Print config errors to stderr, one per line.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        eprintln!("error: {error}");
    }
}
