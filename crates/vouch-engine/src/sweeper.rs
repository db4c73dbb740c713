// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Expiry sweeper: turns stale sessions into timeout decisions.
//!
//! Runs on a fixed interval. Each pass lists sessions older than the TTL
//! and closes them through the same delete-owns-the-decision protocol the
//! live handlers use, so a reviewer action racing a sweep can never
//! double-emit.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use vouch_core::types::Decision;
use vouch_core::VouchError;
use vouch_storage::queries::sessions;

use crate::engine::DecisionEngine;

pub struct Sweeper {
    engine: DecisionEngine,
    ttl_secs: u64,
}

impl Sweeper {
    pub fn new(engine: DecisionEngine, ttl_secs: u64) -> Self {
        Self { engine, ttl_secs }
    }

    /// Run one sweep at time `now`. Returns how many sessions this pass
    /// actually closed.
    pub async fn sweep_once(&self, now: i64) -> Result<usize, VouchError> {
        let expired = sessions::list_expired(self.engine.db(), now, self.ttl_secs).await?;
        let mut closed = 0;

        for session in expired {
            // A reviewer action or a re-sent prompt may land between the
            // list and this delete; the created_at guard means we only
            // evict the exact row we listed, and losing the race means
            // the session is not ours.
            if !sessions::delete_session_if_created_at(
                self.engine.db(),
                session.chat_id,
                session.message_id,
                session.created_at,
            )
            .await?
            {
                continue;
            }
            info!(
                chat_id = session.chat_id,
                message_id = session.message_id,
                age_secs = now - session.created_at,
                "session expired"
            );
            self.engine
                .emit(&session.resume_url, session.chat_id, Decision::Timeout, None)
                .await;
            closed += 1;
        }

        Ok(closed)
    }

    /// Sweep on `interval` until `cancel` fires.
    pub async fn run(&self, interval: Duration, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so a restart does not
        // sweep before the rest of the service is up.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("expiry sweeper stopping");
                    break;
                }
                _ = ticker.tick() => {
                    let now = chrono::Utc::now().timestamp();
                    match self.sweep_once(now).await {
                        Ok(0) => {}
                        Ok(closed) => debug!(closed, "expiry sweep closed sessions"),
                        Err(e) => warn!(error = %e, "expiry sweep failed"),
                    }
                }
            }
        }
    }
}
