// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles for the Vouch trait seams.

pub mod mock_channel;
pub mod mock_notifier;

pub use mock_channel::MockReviewerChannel;
pub use mock_notifier::MockNotifier;
