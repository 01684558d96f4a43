// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cursor-resumable event-log tailing.
//!
//! The tail is a lazy, infinite stream: each pull either yields the
//! next record past the cursor or, after one idle keep-alive interval,
//! a synthetic [`StreamItem::KeepAlive`]. The stream never terminates
//! on its own; dropping it (client disconnect) stops the loop without
//! touching the underlying job.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use futures::Stream;
use futures::stream;
use tracing::warn;

use rostrum_core::{CURSOR_START, EventLog, EventRecord, RostrumError};

use crate::normalize::normalize_payload;

/// One item pulled from a job's event tail.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamItem {
    /// A log record, with its payload normalized to structured data.
    Event {
        cursor: String,
        kind: String,
        data: serde_json::Value,
    },
    /// No record arrived within the idle interval.
    KeepAlive,
}

struct TailState {
    events: Arc<dyn EventLog>,
    job_id: String,
    cursor: String,
    pending: VecDeque<EventRecord>,
    keep_alive: Duration,
}

/// Tail a job's event log starting after `from_cursor`.
///
/// Pass [`rostrum_core::CURSOR_START`] to begin at the earliest
/// still-retained record; a cursor the backend rejects as malformed
/// falls back there too. Read failures degrade to keep-alives so a
/// transient store outage never tears down the connection.
pub fn tail(
    events: Arc<dyn EventLog>,
    job_id: String,
    from_cursor: String,
    keep_alive: Duration,
) -> impl Stream<Item = StreamItem> {
    let state = TailState {
        events,
        job_id,
        cursor: from_cursor,
        pending: VecDeque::new(),
        keep_alive,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(record) = state.pending.pop_front() {
                state.cursor = record.cursor.clone();
                let item = StreamItem::Event {
                    cursor: record.cursor,
                    kind: record.kind,
                    data: normalize_payload(&record.payload),
                };
                return Some((item, state));
            }

            match state
                .events
                .read_after(&state.job_id, &state.cursor, state.keep_alive)
                .await
            {
                Ok(batch) if batch.is_empty() => return Some((StreamItem::KeepAlive, state)),
                Ok(batch) => state.pending.extend(batch),
                // A malformed resume cursor would fail every read; restart
                // from the retained log instead of looping on keep-alives.
                Err(RostrumError::Validation(_)) if state.cursor != CURSOR_START => {
                    warn!(
                        job_id = %state.job_id,
                        cursor = %state.cursor,
                        "invalid resume cursor, restarting from log start"
                    );
                    state.cursor = CURSOR_START.to_string();
                }
                Err(e) => {
                    warn!(job_id = %state.job_id, error = %e, "event log read failed");
                    return Some((StreamItem::KeepAlive, state));
                }
            }
        }
    })
}
