// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Rostrum service.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter behind a trait object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum AdapterType {
    Storage,
    Cache,
    Engine,
}

/// A client session, created or refreshed on every request that presents a
/// `session_id`. Timestamps are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub user_id: Option<String>,
    pub created_at: i64,
    pub expires_at: i64,
    pub last_seen_at: i64,
}

/// Lifecycle status of a debate job. Transitions only move forward:
/// `Running -> Completed` or `Running -> Failed`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DebateStatus {
    Running,
    Completed,
    Failed,
}

impl DebateStatus {
    /// Whether this status is terminal (no further transitions allowed).
    pub fn is_terminal(self) -> bool {
        matches!(self, DebateStatus::Completed | DebateStatus::Failed)
    }
}

/// One generation job. `debate_id` is globally unique and immutable once
/// assigned. Timestamps are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debate {
    pub debate_id: String,
    pub session_id: String,
    pub user_id: Option<String>,
    pub topic: String,
    pub debater_1: String,
    pub debater_2: String,
    pub created_at: i64,
    pub status: DebateStatus,
    pub completed_at: Option<i64>,
    pub error_message: Option<String>,
}

/// Ownership fields of a debate. A job is owned by `user_id` when present,
/// else by `session_id`; this is the sole authorization predicate for
/// reading the job's event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebateOwner {
    pub session_id: String,
    pub user_id: Option<String>,
}

impl DebateOwner {
    /// True iff the presented credential matches the owner exactly. A job
    /// with a `user_id` owner is never accessible via session-only
    /// credentials.
    pub fn matches(&self, session_id: &str, user_id: Option<&str>) -> bool {
        match self.user_id.as_deref() {
            Some(owner_user) => user_id == Some(owner_user),
            None => self.session_id == session_id,
        }
    }
}

/// The inputs handed off to the workflow engine for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateSpec {
    pub debate_id: String,
    pub topic: String,
    pub debater_1: String,
    pub debater_2: String,
}

/// One entry in a per-job append-only event log. Cursor ordering is total
/// within one job's log; cursors are never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub cursor: String,
    pub kind: String,
    pub payload: String,
}
