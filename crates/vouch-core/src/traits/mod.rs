// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the decision core and its I/O shells.

pub mod channel;
pub mod notifier;

pub use channel::ReviewerChannel;
pub use notifier::DecisionNotifier;
