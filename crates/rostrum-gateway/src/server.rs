// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the debate API.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use rostrum_config::model::{ServerConfig, StreamConfig};
use rostrum_coordinator::DebateService;
use rostrum_core::{EventLog, RostrumError};

use crate::handlers;
use crate::sse;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Orchestration facade driving create and authorize flows.
    pub service: Arc<DebateService>,
    /// Per-job event log for SSE tailing.
    pub events: Arc<dyn EventLog>,
    /// Keep-alive interval and log cap settings.
    pub stream: StreamConfig,
}

/// Build the gateway router.
///
/// Routes:
/// - POST /debate
/// - GET /debate/{debate_id}/events (SSE)
/// - GET /health (unauthenticated)
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/debate", post(handlers::post_debate))
        .route("/debate/{debate_id}/events", get(sse::get_debate_events))
        .route("/health", get(handlers::get_health))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve the gateway until the process shuts down.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), RostrumError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener =
        tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| RostrumError::Channel {
                message: format!("failed to bind gateway to {addr}: {e}"),
                source: Some(Box::new(e)),
            })?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| RostrumError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
