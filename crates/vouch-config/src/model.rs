// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Vouch approval gateway.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Vouch configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VouchConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Inbound HTTP gateway settings (workflow-engine side).
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Telegram reviewer channel settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Session TTL and expiry sweep settings.
    #[serde(default)]
    pub review: ReviewConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "vouch".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Inbound HTTP gateway configuration.
///
/// The workflow engine POSTs new review requests here.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8000
}

/// Telegram reviewer channel configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required to serve.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// List of allowed Telegram user IDs or usernames. Applies to both
    /// messages and button presses; an empty list rejects everyone
    /// (secure default).
    #[serde(default)]
    pub allowed_users: Vec<String>,
}

/// Session TTL and expiry sweep configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewConfig {
    /// Seconds a session may stay pending before the sweeper emits a
    /// timeout decision and evicts it.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Seconds between expiry sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_sweep_interval_secs() -> u64 {
    60
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("vouch").join("sessions.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("sessions.db"))
        .to_string_lossy()
        .into_owned()
}
