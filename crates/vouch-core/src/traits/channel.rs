// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reviewer channel seam: how review prompts reach the human reviewer.

use async_trait::async_trait;

use crate::error::VouchError;
use crate::types::ReviewAction;

/// Sends review prompts with inline choices to a reviewer chat.
///
/// The returned message id, combined with the chat id, keys the session
/// in the store; button presses on that message reference the same pair.
#[async_trait]
pub trait ReviewerChannel: Send + Sync + 'static {
    /// Sends `text` to `chat_id` with one button per `(label, action)` pair
    /// plus the fixed reject/custom choices. Returns the channel-assigned
    /// message id.
    async fn send_review_prompt(
        &self,
        chat_id: i64,
        text: &str,
        buttons: &[(String, ReviewAction)],
    ) -> Result<i32, VouchError>;
}
