// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Vouch approval gateway.

use thiserror::Error;

/// The primary error type used across all Vouch crates.
///
/// Expected reviewer-facing outcomes (no session, nothing pending, a second
/// custom prompt in flight) are NOT errors; they are modeled as outcome enums
/// on the decision engine so callers can surface them as chat replies.
#[derive(Debug, Error)]
pub enum VouchError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database open, query failure, migration failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Chat channel errors (send failure, edit failure, malformed update).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Decision delivery to a resume URL failed. The session is already
    /// closed when this surfaces; delivery is fire-and-forget with no retry.
    #[error("decision delivery to {url} failed: {source}")]
    Notify {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
