// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP implementation of the outbound decision notifier.
//!
//! POSTs the JSON decision payload to the resume URL a session recorded.
//! Delivery is at-most-once: a failed call surfaces as an error for the
//! caller to log, and is never retried.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use vouch_core::traits::DecisionNotifier;
use vouch_core::types::DecisionPayload;
use vouch_core::VouchError;

/// How long a resume-URL call may take before we give up on it.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers decisions over HTTP.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: reqwest::Client,
}

impl HttpNotifier {
    pub fn new() -> Result<Self, VouchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| VouchError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DecisionNotifier for HttpNotifier {
    async fn notify(
        &self,
        resume_url: &str,
        payload: &DecisionPayload,
    ) -> Result<(), VouchError> {
        let response = self
            .client
            .post(resume_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| VouchError::Notify {
                url: resume_url.to_string(),
                source: Box::new(e),
            })?;

        let response = response.error_for_status().map_err(|e| VouchError::Notify {
            url: resume_url.to_string(),
            source: Box::new(e),
        })?;

        debug!(
            status = %response.status(),
            decision = %payload.decision,
            "decision delivered to resume URL"
        );
        Ok(())
    }
}
