// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite session store for the Vouch approval gateway.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, and typed
//! operations over pending reviewer sessions. Durability across process
//! restart is what lets an unacknowledged resume URL still be honored or
//! expired after a crash.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use database::Database;
pub use models::*;
pub use queries::sessions::PromoteOutcome;
