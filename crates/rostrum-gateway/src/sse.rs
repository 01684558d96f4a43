// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-Sent Events endpoint for tailing a debate's event log.
//!
//! SSE event format:
//! ```text
//! id: 1718035200000-0
//! event: agent_done
//! data: {"agent": "debater_1", "output": {...}}
//!
//! event: ping
//! data: {}
//! ```
//!
//! The `id:` field carries the log cursor, so a reconnecting client's
//! `Last-Event-ID` header resumes after the last record it saw. Idle
//! periods produce `ping` events instead of errors; the stream runs
//! until the client disconnects.

use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::sse::{Event, Sse},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use serde::Deserialize;

use rostrum_core::{CURSOR_START, RostrumError};
use rostrum_stream::{StreamItem, tail};

use crate::handlers::error_response;
use crate::server::GatewayState;

/// Query parameters for GET /debate/{debate_id}/events.
#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    /// Client session identifier; required.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Authenticated user identifier, when known.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// GET /debate/{debate_id}/events
///
/// Authorizes the credential against job ownership, then streams the
/// job's event log as SSE from the start or from `Last-Event-ID`.
pub async fn get_debate_events(
    State(state): State<GatewayState>,
    Path(debate_id): Path<String>,
    Query(query): Query<EventsQuery>,
    headers: HeaderMap,
) -> Response {
    let Some(session_id) = query.session_id.filter(|s| !s.trim().is_empty()) else {
        return error_response(RostrumError::Validation(
            "session_id query parameter is required".to_string(),
        ));
    };

    if let Err(err) = state
        .service
        .authorize_stream(&debate_id, &session_id, query.user_id.as_deref())
        .await
    {
        return error_response(err);
    }

    let from_cursor = headers
        .get("last-event-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(CURSOR_START)
        .to_string();

    let stream = tail(
        state.events,
        debate_id,
        from_cursor,
        state.stream.keep_alive(),
    )
    .map(|item| -> Result<Event, Infallible> {
        Ok(match item {
            StreamItem::Event { cursor, kind, data } => Event::default()
                .id(cursor)
                .event(kind)
                .data(data.to_string()),
            StreamItem::KeepAlive => Event::default().event("ping").data("{}"),
        })
    });

    Sse::new(stream).into_response()
}
