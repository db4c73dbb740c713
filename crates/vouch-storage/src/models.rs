// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `vouch-core::types` for use across
//! trait boundaries. This module re-exports them for convenience within
//! the storage crate.

pub use vouch_core::types::{PendingSession, SessionKey};
