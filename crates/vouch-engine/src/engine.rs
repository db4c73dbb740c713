// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The session state machine.
//!
//! A session moves Open -> AwaitingCustom -> Closed; terminal actions
//! close it directly. The store's `delete_session` boolean is the
//! linearization point: whoever's delete removed the row owns the one
//! decision the session will ever emit. A caller whose delete found no
//! row lost a race and stays silent.

use std::sync::Arc;

use tracing::{info, warn};
use vouch_core::traits::DecisionNotifier;
use vouch_core::types::{Decision, DecisionPayload, ReviewAction};
use vouch_core::VouchError;
use vouch_storage::queries::sessions;
use vouch_storage::{Database, PromoteOutcome};

/// Result of applying a reviewer button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The session closed with this decision.
    Decided(Decision),
    /// The session now waits for the reviewer's next text message.
    AwaitingCustom,
    /// No session for this key; it expired, was already decided, or
    /// never existed. The press is ignored.
    SessionNotFound,
    /// Another message in this chat already awaits a custom reply.
    AlreadyAwaitingCustom { pending_message_id: i32 },
}

/// Result of routing a plain text message from the reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The text closed the awaiting session as a custom decision.
    Delivered,
    /// Nothing in this chat was waiting for text.
    NoPendingCustom,
}

/// Result of the reviewer's explicit "clear pending" command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// The awaiting session was deleted without emitting a decision.
    Cleared { message_id: i32 },
    NothingToClear,
}

/// Applies reviewer actions to stored sessions and emits decisions.
#[derive(Clone)]
pub struct DecisionEngine {
    db: Database,
    notifier: Arc<dyn DecisionNotifier>,
}

impl DecisionEngine {
    pub fn new(db: Database, notifier: Arc<dyn DecisionNotifier>) -> Self {
        Self { db, notifier }
    }

    /// Open a session for a freshly sent review prompt.
    ///
    /// A prompt re-sent for the same `(chat_id, message_id)` replaces the
    /// old session outright, awaiting-custom state included.
    pub async fn open_session(
        &self,
        chat_id: i64,
        message_id: i32,
        resume_url: &str,
    ) -> Result<(), VouchError> {
        let now = chrono::Utc::now().timestamp();
        sessions::create_session(&self.db, chat_id, message_id, resume_url, now).await?;
        info!(chat_id, message_id, "review session opened");
        Ok(())
    }

    /// Apply a reviewer button press to the session it targets.
    pub async fn apply(
        &self,
        chat_id: i64,
        message_id: i32,
        action: ReviewAction,
    ) -> Result<ApplyOutcome, VouchError> {
        match action.decision() {
            Some(decision) => self.close_with(chat_id, message_id, decision, None).await,
            None => self.request_custom(chat_id, message_id).await,
        }
    }

    /// Route plain text from the reviewer: if a session in this chat is
    /// awaiting a custom reply, the text closes it as a custom decision.
    pub async fn submit_text(
        &self,
        chat_id: i64,
        text: &str,
    ) -> Result<SubmitOutcome, VouchError> {
        let Some(session) = sessions::find_awaiting_custom(&self.db, chat_id).await? else {
            return Ok(SubmitOutcome::NoPendingCustom);
        };

        if !sessions::delete_session(&self.db, chat_id, session.message_id).await? {
            // The sweeper (or a concurrent action) beat us to it.
            return Ok(SubmitOutcome::NoPendingCustom);
        }

        info!(chat_id, message_id = session.message_id, "custom reply received");
        self.emit(&session.resume_url, chat_id, Decision::Custom, Some(text.to_string()))
            .await;
        Ok(SubmitOutcome::Delivered)
    }

    /// Explicitly abandon the awaiting-custom session in this chat.
    ///
    /// The record is deleted and no decision is ever emitted for it;
    /// an abandon is distinct from a decision outcome.
    pub async fn clear_pending(&self, chat_id: i64) -> Result<ClearOutcome, VouchError> {
        let Some(session) = sessions::find_awaiting_custom(&self.db, chat_id).await? else {
            return Ok(ClearOutcome::NothingToClear);
        };

        if !sessions::delete_session(&self.db, chat_id, session.message_id).await? {
            return Ok(ClearOutcome::NothingToClear);
        }

        info!(chat_id, message_id = session.message_id, "pending session cleared");
        Ok(ClearOutcome::Cleared {
            message_id: session.message_id,
        })
    }

    async fn request_custom(
        &self,
        chat_id: i64,
        message_id: i32,
    ) -> Result<ApplyOutcome, VouchError> {
        match sessions::promote_awaiting_custom(&self.db, chat_id, message_id).await? {
            PromoteOutcome::Promoted => Ok(ApplyOutcome::AwaitingCustom),
            PromoteOutcome::Conflict { pending_message_id } => {
                Ok(ApplyOutcome::AlreadyAwaitingCustom { pending_message_id })
            }
            PromoteOutcome::NotFound => Ok(ApplyOutcome::SessionNotFound),
        }
    }

    async fn close_with(
        &self,
        chat_id: i64,
        message_id: i32,
        decision: Decision,
        custom_reply: Option<String>,
    ) -> Result<ApplyOutcome, VouchError> {
        let Some(session) = sessions::get_session(&self.db, chat_id, message_id).await? else {
            return Ok(ApplyOutcome::SessionNotFound);
        };

        if !sessions::delete_session(&self.db, chat_id, message_id).await? {
            return Ok(ApplyOutcome::SessionNotFound);
        }

        info!(chat_id, message_id, %decision, "session decided");
        self.emit(&session.resume_url, chat_id, decision, custom_reply)
            .await;
        Ok(ApplyOutcome::Decided(decision))
    }

    /// Deliver a decision. The session is already gone from the store, so
    /// a delivery failure cannot resurrect it; we log and move on.
    pub(crate) async fn emit(
        &self,
        resume_url: &str,
        chat_id: i64,
        decision: Decision,
        custom_reply: Option<String>,
    ) {
        let payload = DecisionPayload {
            user_id: chat_id,
            decision,
            custom_reply,
        };
        if let Err(e) = self.notifier.notify(resume_url, &payload).await {
            warn!(chat_id, %decision, error = %e, "decision delivery failed");
        }
    }

    pub(crate) fn db(&self) -> &Database {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use vouch_test_utils::MockNotifier;

    async fn setup() -> (DecisionEngine, Arc<MockNotifier>, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("engine.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        let notifier = Arc::new(MockNotifier::new());
        let engine = DecisionEngine::new(db, notifier.clone());
        (engine, notifier, dir)
    }

    #[tokio::test]
    async fn accept_closes_session_and_delivers_once() {
        let (engine, notifier, _dir) = setup().await;
        engine.open_session(10, 1, "https://wf/resume").await.unwrap();

        let outcome = engine.apply(10, 1, ReviewAction::AcceptGpt).await.unwrap();
        assert_eq!(outcome, ApplyOutcome::Decided(Decision::AcceptGpt));

        let deliveries = notifier.deliveries().await;
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].0, "https://wf/resume");
        assert_eq!(deliveries[0].1.user_id, 10);
        assert_eq!(deliveries[0].1.decision, Decision::AcceptGpt);
        assert_eq!(deliveries[0].1.custom_reply, None);

        // A second press on the same message is silent.
        let outcome = engine.apply(10, 1, ReviewAction::Reject).await.unwrap();
        assert_eq!(outcome, ApplyOutcome::SessionNotFound);
        assert_eq!(notifier.delivery_count().await, 1);
    }

    #[tokio::test]
    async fn reject_delivers_reject_decision() {
        let (engine, notifier, _dir) = setup().await;
        engine.open_session(10, 1, "https://wf/resume").await.unwrap();

        let outcome = engine.apply(10, 1, ReviewAction::Reject).await.unwrap();
        assert_eq!(outcome, ApplyOutcome::Decided(Decision::Reject));
        assert_eq!(notifier.deliveries().await[0].1.decision, Decision::Reject);
    }

    #[tokio::test]
    async fn press_on_unknown_message_is_ignored() {
        let (engine, notifier, _dir) = setup().await;
        let outcome = engine.apply(10, 99, ReviewAction::AcceptOther).await.unwrap();
        assert_eq!(outcome, ApplyOutcome::SessionNotFound);
        assert_eq!(notifier.delivery_count().await, 0);
    }

    #[tokio::test]
    async fn custom_flow_awaits_then_delivers_text() {
        let (engine, notifier, _dir) = setup().await;
        engine.open_session(10, 1, "https://wf/resume").await.unwrap();

        let outcome = engine
            .apply(10, 1, ReviewAction::CustomPrompt)
            .await
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::AwaitingCustom);
        assert_eq!(notifier.delivery_count().await, 0);

        let outcome = engine.submit_text(10, "use the shorter draft").await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Delivered);

        let deliveries = notifier.deliveries().await;
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].1.decision, Decision::Custom);
        assert_eq!(
            deliveries[0].1.custom_reply.as_deref(),
            Some("use the shorter draft")
        );

        // The session is closed; further text goes nowhere.
        let outcome = engine.submit_text(10, "more text").await.unwrap();
        assert_eq!(outcome, SubmitOutcome::NoPendingCustom);
        assert_eq!(notifier.delivery_count().await, 1);
    }

    #[tokio::test]
    async fn second_custom_request_in_chat_is_rejected() {
        let (engine, _notifier, _dir) = setup().await;
        engine.open_session(10, 1, "https://wf/a").await.unwrap();
        engine.open_session(10, 2, "https://wf/b").await.unwrap();

        assert_eq!(
            engine.apply(10, 1, ReviewAction::CustomPrompt).await.unwrap(),
            ApplyOutcome::AwaitingCustom
        );
        assert_eq!(
            engine.apply(10, 2, ReviewAction::CustomPrompt).await.unwrap(),
            ApplyOutcome::AlreadyAwaitingCustom {
                pending_message_id: 1
            }
        );

        // The first session still owns the pending custom reply.
        assert_eq!(
            engine.submit_text(10, "reply").await.unwrap(),
            SubmitOutcome::Delivered
        );
    }

    #[tokio::test]
    async fn custom_press_on_unknown_message_is_ignored_despite_pending_custom() {
        let (engine, notifier, _dir) = setup().await;
        engine.open_session(10, 1, "https://wf/resume").await.unwrap();
        engine.apply(10, 1, ReviewAction::CustomPrompt).await.unwrap();

        // A custom-prompt press on a message with no session is an
        // unknown press, not a conflict with the pending custom reply.
        assert_eq!(
            engine.apply(10, 99, ReviewAction::CustomPrompt).await.unwrap(),
            ApplyOutcome::SessionNotFound
        );

        // The pending custom reply is still routable.
        assert_eq!(
            engine.submit_text(10, "reply").await.unwrap(),
            SubmitOutcome::Delivered
        );
        assert_eq!(notifier.delivery_count().await, 1);
    }

    #[tokio::test]
    async fn custom_requests_in_different_chats_are_independent() {
        let (engine, notifier, _dir) = setup().await;
        engine.open_session(10, 1, "https://wf/a").await.unwrap();
        engine.open_session(20, 1, "https://wf/b").await.unwrap();

        assert_eq!(
            engine.apply(10, 1, ReviewAction::CustomPrompt).await.unwrap(),
            ApplyOutcome::AwaitingCustom
        );
        assert_eq!(
            engine.apply(20, 1, ReviewAction::CustomPrompt).await.unwrap(),
            ApplyOutcome::AwaitingCustom
        );

        engine.submit_text(10, "for a").await.unwrap();
        engine.submit_text(20, "for b").await.unwrap();

        let deliveries = notifier.deliveries().await;
        assert_eq!(deliveries.len(), 2);
        assert_eq!(deliveries[0].0, "https://wf/a");
        assert_eq!(deliveries[1].0, "https://wf/b");
    }

    #[tokio::test]
    async fn text_without_pending_custom_is_ignored() {
        let (engine, notifier, _dir) = setup().await;
        engine.open_session(10, 1, "https://wf/resume").await.unwrap();

        let outcome = engine.submit_text(10, "unsolicited").await.unwrap();
        assert_eq!(outcome, SubmitOutcome::NoPendingCustom);
        assert_eq!(notifier.delivery_count().await, 0);

        // The open session is untouched.
        assert_eq!(
            engine.apply(10, 1, ReviewAction::AcceptGemini).await.unwrap(),
            ApplyOutcome::Decided(Decision::AcceptGemini)
        );
    }

    #[tokio::test]
    async fn clear_pending_abandons_session_without_a_decision() {
        let (engine, notifier, _dir) = setup().await;
        engine.open_session(10, 1, "https://wf/resume").await.unwrap();
        engine.apply(10, 1, ReviewAction::CustomPrompt).await.unwrap();

        assert_eq!(
            engine.clear_pending(10).await.unwrap(),
            ClearOutcome::Cleared { message_id: 1 }
        );
        assert_eq!(
            engine.clear_pending(10).await.unwrap(),
            ClearOutcome::NothingToClear
        );

        // The record is gone: text is unsolicited, buttons are stale, and
        // no decision was ever emitted.
        assert_eq!(
            engine.submit_text(10, "stray").await.unwrap(),
            SubmitOutcome::NoPendingCustom
        );
        assert_eq!(
            engine.apply(10, 1, ReviewAction::AcceptClaude).await.unwrap(),
            ApplyOutcome::SessionNotFound
        );
        assert_eq!(notifier.delivery_count().await, 0);
    }

    #[tokio::test]
    async fn clear_pending_ignores_sessions_not_awaiting_custom() {
        let (engine, _notifier, _dir) = setup().await;
        engine.open_session(10, 1, "https://wf/resume").await.unwrap();

        // An open session without a pending custom reply is untouched.
        assert_eq!(
            engine.clear_pending(10).await.unwrap(),
            ClearOutcome::NothingToClear
        );
        assert_eq!(
            engine.apply(10, 1, ReviewAction::AcceptGpt).await.unwrap(),
            ApplyOutcome::Decided(Decision::AcceptGpt)
        );
    }

    #[tokio::test]
    async fn reopened_session_resets_awaiting_custom() {
        let (engine, _notifier, _dir) = setup().await;
        engine.open_session(10, 1, "https://wf/old").await.unwrap();
        engine.apply(10, 1, ReviewAction::CustomPrompt).await.unwrap();

        // The prompt is re-sent under the same key; the old awaiting
        // state must not leak into the new session.
        engine.open_session(10, 1, "https://wf/new").await.unwrap();
        assert_eq!(
            engine.submit_text(10, "stale reply").await.unwrap(),
            SubmitOutcome::NoPendingCustom
        );
    }

    #[tokio::test]
    async fn delivery_failure_still_closes_the_session() {
        let (engine, notifier, _dir) = setup().await;
        engine.open_session(10, 1, "https://wf/resume").await.unwrap();
        notifier.fail_deliveries(true);

        let outcome = engine.apply(10, 1, ReviewAction::AcceptGpt).await.unwrap();
        assert_eq!(outcome, ApplyOutcome::Decided(Decision::AcceptGpt));
        assert_eq!(notifier.delivery_count().await, 0);

        // No retry, no resurrection.
        assert_eq!(
            engine.apply(10, 1, ReviewAction::AcceptGpt).await.unwrap(),
            ApplyOutcome::SessionNotFound
        );
    }
}
