// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All access is serialized through tokio-rusqlite's single background
//! thread, which makes every query function atomic with respect to the rows
//! it touches. Do NOT create additional Connection instances for writes.

use std::path::Path;

use thiserror::Error;
use tokio_rusqlite::Connection;
use tracing::debug;
use vouch_core::VouchError;

use crate::migrations;

/// Error raised by the pragma-and-migrate closure run at open time.
///
/// The closure passed to `call` needs a single error type; this folds the
/// rusqlite pragma failures and the refinery migration failures into one.
#[derive(Debug, Error)]
enum SetupError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Migration(#[from] refinery::Error),
}

/// Handle to the SQLite session store.
///
/// Cheap to clone; all clones share the single background writer thread.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if necessary) the database at `path`, apply PRAGMAs,
    /// and run pending migrations.
    pub async fn open(path: &str) -> Result<Self, VouchError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| VouchError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = Connection::open(path).await.map_err(|e| VouchError::Storage {
            source: Box::new(e),
        })?;

        conn.call(|conn| -> Result<(), SetupError> {
            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "busy_timeout", 5000)?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            migrations::run_migrations(conn)?;
            Ok(())
        })
        .await
        .map_err(|e| VouchError::Storage {
            source: Box::new(e),
        })?;

        debug!(path, "session database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the database, flushing pending writes.
    pub async fn close(self) -> Result<(), VouchError> {
        self.conn.close().await.map_err(map_tr_err)
    }
}

/// Map a tokio-rusqlite error into the workspace error type.
///
/// Takes the default error parameter (`rusqlite::Error`), which also pins
/// the closure error type at the `call` sites in the query layer.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> VouchError {
    VouchError::Storage {
        source: Box::new(e),
    }
}
