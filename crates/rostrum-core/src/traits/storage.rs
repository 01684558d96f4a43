// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metadata store trait: durable sessions and debate jobs.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::RostrumError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Debate, DebateOwner, DebateStatus, Session};

/// Fields for an atomic debate-job insert. Status is always `running` at
/// creation time.
#[derive(Debug, Clone)]
pub struct NewDebate {
    pub debate_id: String,
    pub session_id: String,
    pub user_id: Option<String>,
    pub topic: String,
    pub debater_1: String,
    pub debater_2: String,
}

/// Durable record of sessions and debate jobs; ownership and retention.
///
/// All mutations are wrapped in a single local transaction per call:
/// either the write fully lands or nothing does.
#[async_trait]
pub trait MetadataStore: PluginAdapter {
    /// Opens the backing database and runs pending migrations.
    async fn initialize(&self) -> Result<(), RostrumError>;

    /// Closes the backing database, flushing pending writes.
    async fn close(&self) -> Result<(), RostrumError>;

    /// Idempotent create-or-refresh. Extends `expires_at` by `ttl` from now
    /// and advances `last_seen_at`. A non-null `user_id` already attached
    /// to the session is never overwritten by a later null value.
    async fn upsert_session(
        &self,
        session_id: &str,
        user_id: Option<&str>,
        ttl: Duration,
    ) -> Result<(), RostrumError>;

    /// Fetches a session by id.
    async fn get_session(&self, session_id: &str) -> Result<Option<Session>, RostrumError>;

    /// Single atomic insert with status `running`. Fails with
    /// [`RostrumError::Conflict`] if `debate_id` already exists.
    async fn create_debate(&self, debate: &NewDebate) -> Result<(), RostrumError>;

    /// Fetches a full debate row by id.
    async fn get_debate(&self, debate_id: &str) -> Result<Option<Debate>, RostrumError>;

    /// Fetches just the ownership fields of a debate.
    async fn get_debate_owner(
        &self,
        debate_id: &str,
    ) -> Result<Option<DebateOwner>, RostrumError>;

    /// Sets the terminal status of a debate. Only `running -> completed`
    /// and `running -> failed` are allowed; `failed` requires a non-empty
    /// `error_message`; `completed` clears any prior error.
    async fn update_debate_status(
        &self,
        debate_id: &str,
        status: DebateStatus,
        error_message: Option<&str>,
    ) -> Result<(), RostrumError>;

    /// True iff the presented credential matches the debate's owner.
    /// Unknown debates are not authorized.
    async fn is_authorized(
        &self,
        debate_id: &str,
        session_id: &str,
        user_id: Option<&str>,
    ) -> Result<bool, RostrumError>;

    /// Deletes sessions whose `expires_at` has passed. Bounded-size delete;
    /// returns the number of rows removed.
    async fn sweep_expired_sessions(&self) -> Result<usize, RostrumError>;

    /// Deletes debates older than `max_age`. Bounded-size delete; returns
    /// the number of rows removed.
    async fn sweep_old_debates(&self, max_age: Duration) -> Result<usize, RostrumError>;
}
