// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Debate job CRUD, ownership reads, and retention sweep.

use std::str::FromStr;
use std::time::Duration;

use rostrum_core::traits::storage::NewDebate;
use rostrum_core::{DebateStatus, RostrumError};
use rusqlite::params;

use crate::database::Database;
use crate::models::{Debate, DebateOwner};
use crate::queries::sessions::SWEEP_BATCH;

/// Insert a new debate row with status `running`.
///
/// A primary-key collision maps to [`RostrumError::Conflict`]; given
/// uuid-v4 identifier generation it should be unreachable, but it is a
/// checked condition, not an assumption.
pub async fn create_debate(db: &Database, debate: &NewDebate) -> Result<(), RostrumError> {
    let debate = debate.clone();
    let debate_id = debate.debate_id.clone();
    let now = chrono::Utc::now().timestamp();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO debates (
                     debate_id, session_id, user_id, topic, debater_1, debater_2,
                     created_at, status
                 )
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'running')",
                params![
                    debate.debate_id,
                    debate.session_id,
                    debate.user_id,
                    debate.topic,
                    debate.debater_1,
                    debate.debater_2,
                    now,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| match &e {
            tokio_rusqlite::Error::Error(rusqlite::Error::SqliteFailure(f, _))
                if f.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                RostrumError::Conflict(format!("debate_id already exists: {debate_id}"))
            }
            _ => crate::database::map_tr_err(e),
        })
}

fn row_to_debate(row: &rusqlite::Row<'_>) -> Result<Debate, rusqlite::Error> {
    let status_text: String = row.get(7)?;
    let status = DebateStatus::from_str(&status_text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Debate {
        debate_id: row.get(0)?,
        session_id: row.get(1)?,
        user_id: row.get(2)?,
        topic: row.get(3)?,
        debater_1: row.get(4)?,
        debater_2: row.get(5)?,
        created_at: row.get(6)?,
        status,
        completed_at: row.get(8)?,
        error_message: row.get(9)?,
    })
}

/// Get a full debate row by ID.
pub async fn get_debate(db: &Database, debate_id: &str) -> Result<Option<Debate>, RostrumError> {
    let debate_id = debate_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT debate_id, session_id, user_id, topic, debater_1, debater_2,
                        created_at, status, completed_at, error_message
                 FROM debates WHERE debate_id = ?1",
            )?;
            let result = stmt.query_row(params![debate_id], row_to_debate);
            match result {
                Ok(debate) => Ok(Some(debate)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get only the ownership fields of a debate.
pub async fn get_debate_owner(
    db: &Database,
    debate_id: &str,
) -> Result<Option<DebateOwner>, RostrumError> {
    let debate_id = debate_id.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT session_id, user_id FROM debates WHERE debate_id = ?1",
                params![debate_id],
                |row| {
                    Ok(DebateOwner {
                        session_id: row.get(0)?,
                        user_id: row.get(1)?,
                    })
                },
            );
            match result {
                Ok(owner) => Ok(Some(owner)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Outcome of the transactional status check, carried out of the closure
/// so the caller can map it to the right error kind.
enum StatusOutcome {
    Applied,
    Missing,
    NotRunning(String),
}

/// Set the terminal status of a debate.
///
/// Enforces monotonicity: only `running -> completed` and `running ->
/// failed` are allowed. `failed` requires a non-empty message; `completed`
/// clears any prior error.
pub async fn update_debate_status(
    db: &Database,
    debate_id: &str,
    status: DebateStatus,
    error_message: Option<&str>,
) -> Result<(), RostrumError> {
    if status == DebateStatus::Running {
        return Err(RostrumError::Conflict(
            "status cannot transition back to running".to_string(),
        ));
    }
    if status == DebateStatus::Failed
        && error_message.map(str::trim).unwrap_or_default().is_empty()
    {
        return Err(RostrumError::Validation(
            "failed status requires a non-empty error_message".to_string(),
        ));
    }

    let id = debate_id.to_string();
    let status_text = status.to_string();
    let error_message = match status {
        DebateStatus::Failed => error_message.map(|m| m.to_string()),
        _ => None, // completed clears any prior error
    };
    let now = chrono::Utc::now().timestamp();

    let outcome = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let current: Result<String, rusqlite::Error> = tx.query_row(
                "SELECT status FROM debates WHERE debate_id = ?1",
                params![id],
                |row| row.get(0),
            );
            let outcome = match current {
                Ok(current) if current == "running" => {
                    tx.execute(
                        "UPDATE debates
                         SET status = ?1, completed_at = ?2, error_message = ?3
                         WHERE debate_id = ?4",
                        params![status_text, now, error_message, id],
                    )?;
                    StatusOutcome::Applied
                }
                Ok(current) => StatusOutcome::NotRunning(current),
                Err(rusqlite::Error::QueryReturnedNoRows) => StatusOutcome::Missing,
                Err(e) => return Err(e.into()),
            };
            tx.commit()?;
            Ok(outcome)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    match outcome {
        StatusOutcome::Applied => Ok(()),
        StatusOutcome::Missing => Err(RostrumError::NotFound {
            debate_id: debate_id.to_string(),
        }),
        StatusOutcome::NotRunning(current) => Err(RostrumError::Conflict(format!(
            "debate is already {current}; terminal status is set exactly once"
        ))),
    }
}

/// True iff the presented credential matches the debate's owner.
pub async fn is_authorized(
    db: &Database,
    debate_id: &str,
    session_id: &str,
    user_id: Option<&str>,
) -> Result<bool, RostrumError> {
    let owner = get_debate_owner(db, debate_id).await?;
    Ok(owner
        .map(|o| o.matches(session_id, user_id))
        .unwrap_or(false))
}

/// Delete debates older than `max_age`. Bounded to [`SWEEP_BATCH`] rows;
/// returns the number removed.
pub async fn sweep_old_debates(db: &Database, max_age: Duration) -> Result<usize, RostrumError> {
    let threshold = chrono::Utc::now().timestamp() - max_age.as_secs() as i64;
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM debates WHERE debate_id IN (
                     SELECT debate_id FROM debates WHERE created_at < ?1 LIMIT ?2
                 )",
                params![threshold, SWEEP_BATCH as i64],
            )?;
            Ok(deleted)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
