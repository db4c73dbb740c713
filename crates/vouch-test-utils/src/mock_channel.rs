// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock reviewer channel for deterministic testing.
//!
//! Captures every review prompt and hands out monotonically increasing
//! message ids, standing in for a real chat channel.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use vouch_core::traits::ReviewerChannel;
use vouch_core::types::ReviewAction;
use vouch_core::VouchError;

/// A prompt captured by [`MockReviewerChannel`].
#[derive(Debug, Clone)]
pub struct SentPrompt {
    pub chat_id: i64,
    pub message_id: i32,
    pub text: String,
    pub buttons: Vec<(String, ReviewAction)>,
}

/// A mock reviewer channel that records sent prompts.
pub struct MockReviewerChannel {
    sent: Arc<Mutex<Vec<SentPrompt>>>,
    next_message_id: AtomicI32,
}

impl MockReviewerChannel {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            next_message_id: AtomicI32::new(1),
        }
    }

    /// All prompts sent so far, in order.
    pub async fn sent_prompts(&self) -> Vec<SentPrompt> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

impl Default for MockReviewerChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReviewerChannel for MockReviewerChannel {
    async fn send_review_prompt(
        &self,
        chat_id: i64,
        text: &str,
        buttons: &[(String, ReviewAction)],
    ) -> Result<i32, VouchError> {
        let message_id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().await.push(SentPrompt {
            chat_id,
            message_id,
            text: text.to_string(),
            buttons: buttons.to_vec(),
        });
        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn assigns_increasing_message_ids() {
        let channel = MockReviewerChannel::new();
        let first = channel
            .send_review_prompt(10, "review this", &[])
            .await
            .unwrap();
        let second = channel
            .send_review_prompt(10, "and this", &[])
            .await
            .unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn captures_prompt_text_and_buttons() {
        let channel = MockReviewerChannel::new();
        let buttons = vec![("\u{1F916} GPT".to_string(), ReviewAction::AcceptGpt)];
        channel
            .send_review_prompt(42, "pick one", &buttons)
            .await
            .unwrap();

        let sent = channel.sent_prompts().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].chat_id, 42);
        assert_eq!(sent[0].text, "pick one");
        assert_eq!(sent[0].buttons, buttons);
    }
}
