// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Vouch workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Composite key of a pending session: the chat and the review message
/// the inline buttons are attached to. Both ids are assigned by the chat
/// channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub chat_id: i64,
    pub message_id: i32,
}

impl SessionKey {
    pub fn new(chat_id: i64, message_id: i32) -> Self {
        Self { chat_id, message_id }
    }
}

/// One pending reviewer decision, as persisted in the session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSession {
    pub chat_id: i64,
    pub message_id: i32,
    /// Callback address supplied by the workflow engine; opaque to us.
    pub resume_url: String,
    /// True once the reviewer chose "write a custom reply" and we are
    /// waiting for the next text message from this chat. At most one
    /// session per chat may have this set.
    pub awaiting_custom: bool,
    /// Unix seconds at session creation; drives the expiry sweep.
    pub created_at: i64,
}

impl PendingSession {
    pub fn key(&self) -> SessionKey {
        SessionKey::new(self.chat_id, self.message_id)
    }
}

/// A reviewer action arriving from the chat channel as callback data.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    AcceptGpt,
    AcceptClaude,
    AcceptGemini,
    AcceptOther,
    Reject,
    CustomPrompt,
}

impl ReviewAction {
    /// The terminal decision this action maps to.
    ///
    /// `CustomPrompt` returns `None`: it transitions the session to
    /// awaiting-custom and the decision is emitted later, when text arrives.
    pub fn decision(self) -> Option<Decision> {
        match self {
            ReviewAction::AcceptGpt => Some(Decision::AcceptGpt),
            ReviewAction::AcceptClaude => Some(Decision::AcceptClaude),
            ReviewAction::AcceptGemini => Some(Decision::AcceptGemini),
            ReviewAction::AcceptOther => Some(Decision::AcceptOther),
            ReviewAction::Reject => Some(Decision::Reject),
            ReviewAction::CustomPrompt => None,
        }
    }
}

/// The terminal outcome of a session, delivered exactly once to the
/// workflow engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    AcceptGpt,
    AcceptClaude,
    AcceptGemini,
    AcceptOther,
    Reject,
    Custom,
    Timeout,
}

/// JSON body POSTed to the resume URL when a session closes.
///
/// `custom_reply` is always present on the wire (null unless the decision
/// is `custom`), matching what workflow engines downstream expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionPayload {
    pub user_id: i64,
    pub decision: Decision,
    pub custom_reply: Option<String>,
}
