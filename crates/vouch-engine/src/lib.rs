// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decision engine for the Vouch approval gateway.
//!
//! Owns the session state machine: opening sessions when a review prompt
//! goes out, applying reviewer actions, collecting custom reply text, and
//! sweeping expired sessions into timeout decisions. Each session emits
//! exactly one decision; ownership of the emission is decided by whose
//! store delete lands first.

pub mod engine;
pub mod sweeper;

pub use engine::{ApplyOutcome, ClearOutcome, DecisionEngine, SubmitOutcome};
pub use sweeper::Sweeper;
