// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the debate REST API.
//!
//! Handles POST /debate and GET /health; the SSE stream endpoint lives
//! in [`crate::sse`].

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use rostrum_coordinator::CreateDebateRequest;
use rostrum_core::RostrumError;

use crate::server::GatewayState;

/// Request body for POST /debate.
#[derive(Debug, Deserialize)]
pub struct DebateRequest {
    /// Debate topic.
    pub topic: String,
    /// First debater persona. Order matters for generated content.
    pub debater_1: String,
    /// Second debater persona.
    pub debater_2: String,
    /// Client session identifier; required, non-blank. Defaulted so an
    /// omitted field reaches the same 400 validation path as a blank one
    /// instead of a deserialization rejection.
    #[serde(default)]
    pub session_id: String,
    /// Authenticated user identifier, when known.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Response body for POST /debate.
#[derive(Debug, Serialize)]
pub struct DebateResponse {
    /// Job identifier, fresh or reused.
    pub debate_id: String,
    /// True when served from the fingerprint cache.
    pub cached: bool,
    /// Present and true when another caller's in-progress job was
    /// joined instead of creating a new one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inflight: Option<bool>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Map a service error to its HTTP status per the error taxonomy.
pub fn error_response(err: RostrumError) -> Response {
    let status = match &err {
        RostrumError::Validation(_) => StatusCode::BAD_REQUEST,
        RostrumError::Forbidden => StatusCode::FORBIDDEN,
        RostrumError::NotFound { .. } => StatusCode::NOT_FOUND,
        RostrumError::Busy => StatusCode::CONFLICT,
        // Duplicate-id conflicts are invariant violations, not client
        // errors; everything store-side is a server fault.
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// POST /debate
///
/// Creates a debate job or reuses one via the dedup coordinator.
pub async fn post_debate(
    State(state): State<GatewayState>,
    Json(body): Json<DebateRequest>,
) -> Response {
    let request = CreateDebateRequest {
        topic: body.topic,
        debater_1: body.debater_1,
        debater_2: body.debater_2,
        session_id: body.session_id,
        user_id: body.user_id,
    };

    match state.service.create_debate(request).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(DebateResponse {
                debate_id: outcome.debate_id,
                cached: outcome.cached,
                inflight: outcome.inflight.then_some(true),
            }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /health
pub async fn get_health() -> Response {
    Json(serde_json::json!({ "status": "ok" })).into_response()
}
