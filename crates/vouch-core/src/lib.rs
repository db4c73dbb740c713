// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Vouch approval gateway.
//!
//! Vouch relays AI-generated candidate replies to a human reviewer over a
//! chat channel and reports the reviewer's decision back to the workflow
//! engine that asked. This crate holds the shared vocabulary: session and
//! decision types, the error enum, and the trait seams the I/O shells
//! (chat channel, HTTP notifier) plug into.

pub mod error;
pub mod traits;
pub mod types;

pub use error::VouchError;
pub use traits::{DecisionNotifier, ReviewerChannel};
pub use types::{Decision, DecisionPayload, PendingSession, ReviewAction, SessionKey};
