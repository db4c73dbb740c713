// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session store operations.
//!
//! Every function is a single `conn.call` and therefore atomic: the
//! tokio-rusqlite background thread serializes all access, so concurrent
//! callers never observe a partially applied mutation.

use rusqlite::params;
use vouch_core::VouchError;

use crate::database::Database;
use crate::models::PendingSession;

/// Result of attempting to move a session into the awaiting-custom state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoteOutcome {
    /// The session is now awaiting a custom reply (or already was).
    Promoted,
    /// A different message in this chat is already awaiting a custom
    /// reply; nothing was mutated.
    Conflict { pending_message_id: i32 },
    /// No session exists for the given key.
    NotFound,
}

fn row_to_session(row: &rusqlite::Row<'_>) -> Result<PendingSession, rusqlite::Error> {
    Ok(PendingSession {
        chat_id: row.get(0)?,
        message_id: row.get(1)?,
        resume_url: row.get(2)?,
        awaiting_custom: row.get::<_, i64>(3)? != 0,
        created_at: row.get(4)?,
    })
}

const SESSION_COLUMNS: &str = "chat_id, message_id, resume_url, awaiting_custom, created_at";

/// Create a session, replacing any prior session at the same key.
///
/// Replacement resets `awaiting_custom` to false; a re-sent review prompt
/// starts over.
pub async fn create_session(
    db: &Database,
    chat_id: i64,
    message_id: i32,
    resume_url: &str,
    now: i64,
) -> Result<(), VouchError> {
    let resume_url = resume_url.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO pending_sessions
                 (chat_id, message_id, resume_url, awaiting_custom, created_at)
                 VALUES (?1, ?2, ?3, 0, ?4)",
                params![chat_id, message_id, resume_url, now],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a session by key.
pub async fn get_session(
    db: &Database,
    chat_id: i64,
    message_id: i32,
) -> Result<Option<PendingSession>, VouchError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM pending_sessions
                 WHERE chat_id = ?1 AND message_id = ?2"
            ))?;
            let result = stmt.query_row(params![chat_id, message_id], row_to_session);
            match result {
                Ok(session) => Ok(Some(session)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Find the session awaiting a custom reply in the given chat, if any.
///
/// At most one row can match; the partial unique index on
/// `(chat_id) WHERE awaiting_custom = 1` enforces the single-flight
/// invariant at the storage layer.
pub async fn find_awaiting_custom(
    db: &Database,
    chat_id: i64,
) -> Result<Option<PendingSession>, VouchError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM pending_sessions
                 WHERE chat_id = ?1 AND awaiting_custom = 1"
            ))?;
            let result = stmt.query_row(params![chat_id], row_to_session);
            match result {
                Ok(session) => Ok(Some(session)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Set or clear the awaiting-custom flag on a session.
///
/// Returns false if the key is absent. Prefer [`promote_awaiting_custom`]
/// when setting the flag: it performs the single-flight check and the
/// update in one transaction.
pub async fn set_awaiting_custom(
    db: &Database,
    chat_id: i64,
    message_id: i32,
    awaiting: bool,
) -> Result<bool, VouchError> {
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE pending_sessions SET awaiting_custom = ?3
                 WHERE chat_id = ?1 AND message_id = ?2",
                params![chat_id, message_id, awaiting as i64],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Atomically check the single-flight invariant and mark the session as
/// awaiting a custom reply.
///
/// The target key is checked for existence before the per-chat conflict:
/// a press on an unknown message reports `NotFound` even while another
/// message in the chat awaits a custom reply. Both checks and the update
/// run in one transaction on the single writer thread, so two concurrent
/// promotions in the same chat can never both succeed.
pub async fn promote_awaiting_custom(
    db: &Database,
    chat_id: i64,
    message_id: i32,
) -> Result<PromoteOutcome, VouchError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let exists = {
                let mut stmt = tx.prepare(
                    "SELECT 1 FROM pending_sessions
                     WHERE chat_id = ?1 AND message_id = ?2",
                )?;
                stmt.exists(params![chat_id, message_id])?
            };

            let outcome = if !exists {
                PromoteOutcome::NotFound
            } else {
                let pending: Option<i32> = {
                    let mut stmt = tx.prepare(
                        "SELECT message_id FROM pending_sessions
                         WHERE chat_id = ?1 AND awaiting_custom = 1",
                    )?;
                    match stmt.query_row(params![chat_id], |row| row.get(0)) {
                        Ok(id) => Some(id),
                        Err(rusqlite::Error::QueryReturnedNoRows) => None,
                        Err(e) => return Err(e),
                    }
                };

                match pending {
                    Some(id) if id != message_id => PromoteOutcome::Conflict {
                        pending_message_id: id,
                    },
                    // Already awaiting on this very message; idempotent.
                    Some(_) => PromoteOutcome::Promoted,
                    None => {
                        tx.execute(
                            "UPDATE pending_sessions SET awaiting_custom = 1
                             WHERE chat_id = ?1 AND message_id = ?2",
                            params![chat_id, message_id],
                        )?;
                        PromoteOutcome::Promoted
                    }
                }
            };

            tx.commit()?;
            Ok(outcome)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a session. No-op if the key is absent.
///
/// Returns true iff a row was removed. That boolean is the exactly-once
/// ownership point for decision emission: when the sweeper and a live
/// reviewer action race on the same key, only the caller whose delete
/// landed emits the decision.
pub async fn delete_session(
    db: &Database,
    chat_id: i64,
    message_id: i32,
) -> Result<bool, VouchError> {
    db.connection()
        .call(move |conn| {
            let removed = conn.execute(
                "DELETE FROM pending_sessions WHERE chat_id = ?1 AND message_id = ?2",
                params![chat_id, message_id],
            )?;
            Ok(removed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a session only if its `created_at` still matches.
///
/// The sweeper lists expiry candidates and then deletes; a session
/// re-created under the same key in between carries a fresh `created_at`
/// and must survive the sweep.
pub async fn delete_session_if_created_at(
    db: &Database,
    chat_id: i64,
    message_id: i32,
    created_at: i64,
) -> Result<bool, VouchError> {
    db.connection()
        .call(move |conn| {
            let removed = conn.execute(
                "DELETE FROM pending_sessions
                 WHERE chat_id = ?1 AND message_id = ?2 AND created_at = ?3",
                params![chat_id, message_id, created_at],
            )?;
            Ok(removed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List sessions older than `ttl_secs` at time `now`. Reads only; the
/// sweeper deletes through [`delete_session_if_created_at`].
pub async fn list_expired(
    db: &Database,
    now: i64,
    ttl_secs: u64,
) -> Result<Vec<PendingSession>, VouchError> {
    let cutoff = now - ttl_secs as i64;
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM pending_sessions
                 WHERE created_at < ?1 ORDER BY created_at ASC"
            ))?;
            let rows = stmt.query_map(params![cutoff], row_to_session)?;
            let mut sessions = Vec::new();
            for row in rows {
                sessions.push(row?);
            }
            Ok(sessions)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
