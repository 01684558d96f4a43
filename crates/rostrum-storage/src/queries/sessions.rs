// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session upsert, lookup, and expiry sweep.

use std::time::Duration;

use rostrum_core::RostrumError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Session;

/// Maximum rows removed per sweep call, to keep the request path cheap.
pub(crate) const SWEEP_BATCH: usize = 256;

/// Create-or-refresh a session. Extends `expires_at` by `ttl` from now and
/// advances `last_seen_at`. A non-null `user_id` is never overwritten by a
/// later null value.
pub async fn upsert_session(
    db: &Database,
    session_id: &str,
    user_id: Option<&str>,
    ttl: Duration,
) -> Result<(), RostrumError> {
    let session_id = session_id.to_string();
    let user_id = user_id.map(|u| u.to_string());
    let now = chrono::Utc::now().timestamp();
    let expires_at = now + ttl.as_secs() as i64;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sessions (session_id, user_id, created_at, expires_at, last_seen_at)
                 VALUES (?1, ?2, ?3, ?4, ?3)
                 ON CONFLICT(session_id) DO UPDATE SET
                     user_id = CASE
                         WHEN sessions.user_id IS NULL AND excluded.user_id IS NOT NULL
                         THEN excluded.user_id
                         ELSE sessions.user_id
                     END,
                     expires_at = excluded.expires_at,
                     last_seen_at = excluded.last_seen_at",
                params![session_id, user_id, now, expires_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a session by ID.
pub async fn get_session(db: &Database, id: &str) -> Result<Option<Session>, RostrumError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT session_id, user_id, created_at, expires_at, last_seen_at
                 FROM sessions WHERE session_id = ?1",
            )?;
            let result = stmt.query_row(params![id], |row| {
                Ok(Session {
                    session_id: row.get(0)?,
                    user_id: row.get(1)?,
                    created_at: row.get(2)?,
                    expires_at: row.get(3)?,
                    last_seen_at: row.get(4)?,
                })
            });
            match result {
                Ok(session) => Ok(Some(session)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete sessions whose `expires_at` has passed. Bounded to
/// [`SWEEP_BATCH`] rows; returns the number removed.
pub async fn sweep_expired_sessions(db: &Database) -> Result<usize, RostrumError> {
    let now = chrono::Utc::now().timestamp();
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM sessions WHERE session_id IN (
                     SELECT session_id FROM sessions WHERE expires_at < ?1 LIMIT ?2
                 )",
                params![now, SWEEP_BATCH as i64],
            )?;
            Ok(deleted)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
