// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound notifier seam: delivery of a terminal decision to the
//! workflow engine's resume URL.

use async_trait::async_trait;

use crate::error::VouchError;
use crate::types::DecisionPayload;

/// Delivers a decision payload to the resume URL a session recorded.
///
/// Delivery is at-most-once: the engine emits each decision exactly once
/// and never retries a failed call. Implementations must not block the
/// caller beyond an ordinary request timeout.
#[async_trait]
pub trait DecisionNotifier: Send + Sync + 'static {
    async fn notify(&self, resume_url: &str, payload: &DecisionPayload)
        -> Result<(), VouchError>;
}
