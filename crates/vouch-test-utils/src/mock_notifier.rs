// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock decision notifier for deterministic testing.
//!
//! Captures every delivery for assertion and can be switched into a
//! failing mode to exercise the at-most-once, no-retry delivery path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use vouch_core::traits::DecisionNotifier;
use vouch_core::types::DecisionPayload;
use vouch_core::VouchError;

/// A mock notifier that records `(resume_url, payload)` pairs.
pub struct MockNotifier {
    deliveries: Arc<Mutex<Vec<(String, DecisionPayload)>>>,
    fail: AtomicBool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            deliveries: Arc::new(Mutex::new(Vec::new())),
            fail: AtomicBool::new(false),
        }
    }

    /// Make every subsequent `notify` call return an error.
    pub fn fail_deliveries(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// All deliveries captured so far, in order.
    pub async fn deliveries(&self) -> Vec<(String, DecisionPayload)> {
        self.deliveries.lock().await.clone()
    }

    pub async fn delivery_count(&self) -> usize {
        self.deliveries.lock().await.len()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecisionNotifier for MockNotifier {
    async fn notify(
        &self,
        resume_url: &str,
        payload: &DecisionPayload,
    ) -> Result<(), VouchError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(VouchError::Notify {
                url: resume_url.to_string(),
                source: "injected delivery failure".into(),
            });
        }
        self.deliveries
            .lock()
            .await
            .push((resume_url.to_string(), payload.clone()));
        Ok(())
    }
}
