// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only per-job event log trait.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::RostrumError;
use crate::traits::adapter::PluginAdapter;
use crate::types::EventRecord;

/// Cursor value denoting "from the beginning of what remains in the log".
pub const CURSOR_START: &str = "0";

/// Append-only per-job event log with tailing reads.
///
/// Within one job's log, delivery order equals append order; no ordering
/// is guaranteed across jobs. Logs are capped at a bounded maximum length
/// (set at store construction), discarding the oldest records once the
/// cap is exceeded.
#[async_trait]
pub trait EventLog: PluginAdapter {
    /// Appends one record to the job's log with a strictly increasing
    /// cursor, returning that cursor.
    async fn publish(
        &self,
        job_id: &str,
        kind: &str,
        payload: &str,
    ) -> Result<String, RostrumError>;

    /// Returns records with cursor strictly greater than `cursor`,
    /// blocking up to `wait` when none are available yet. An empty result
    /// means the wait elapsed with no new records. [`CURSOR_START`]
    /// resumes from the earliest still-retained record.
    async fn read_after(
        &self,
        job_id: &str,
        cursor: &str,
        wait: Duration,
    ) -> Result<Vec<EventRecord>, RostrumError>;
}
