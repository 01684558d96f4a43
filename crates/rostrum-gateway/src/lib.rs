// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/SSE gateway for the Rostrum debate service.
//!
//! Exposes the coordination layer over three routes: job creation,
//! event-log streaming, and an unauthenticated health probe.

pub mod handlers;
pub mod server;
pub mod sse;

pub use server::{GatewayState, router, start_server};

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use rostrum_cache::MemoryStore;
    use rostrum_cache::keys::{inflight_key, lock_key};
    use rostrum_config::model::{CacheConfig, SessionConfig, StorageConfig, StreamConfig};
    use rostrum_coordinator::{DebateService, build_fingerprint};
    use rostrum_core::{
        CacheStore, DebateEngine, DebateSpec, EventLog, MetadataStore, RostrumError,
    };
    use rostrum_storage::SqliteMetadata;

    use crate::server::{GatewayState, router};

    struct NoopEngine;

    #[async_trait]
    impl DebateEngine for NoopEngine {
        async fn run(&self, _spec: DebateSpec) -> Result<(), RostrumError> {
            Ok(())
        }
    }

    async fn test_state(dir: &tempfile::TempDir) -> (GatewayState, Arc<MemoryStore>) {
        let db_path = dir.path().join("gateway.db");
        let storage = Arc::new(SqliteMetadata::new(StorageConfig {
            database_path: db_path.to_str().unwrap().to_string(),
        }));
        storage.initialize().await.unwrap();

        let store = Arc::new(MemoryStore::new(64));
        let service = Arc::new(DebateService::new(
            storage,
            Arc::clone(&store) as Arc<dyn CacheStore>,
            Arc::new(NoopEngine),
            CacheConfig {
                wait_retries: 1,
                wait_interval_ms: 5,
                ..CacheConfig::default()
            },
            SessionConfig::default(),
        ));
        let state = GatewayState {
            service,
            events: Arc::clone(&store) as Arc<dyn EventLog>,
            stream: StreamConfig {
                keep_alive_secs: 1,
                max_events: 64,
            },
        };
        (state, store)
    }

    fn post_debate_request(body: &serde_json::Value) -> Request<axum::body::Body> {
        Request::builder()
            .method("POST")
            .uri("/debate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_is_open() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _store) = test_state(&dir).await;

        let response = router(state)
            .oneshot(Request::get("/health").body(axum::body::Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn create_debate_returns_fresh_job() {
        let dir = tempfile::tempdir().unwrap();
        let (state, store) = test_state(&dir).await;

        let response = router(state)
            .oneshot(post_debate_request(&serde_json::json!({
                "topic": "Topic",
                "debater_1": "A",
                "debater_2": "B",
                "session_id": "s1",
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["cached"], false);
        assert!(body.get("inflight").is_none());

        // The inflight pointer carries the returned id.
        let fp = build_fingerprint("Topic", "A", "B", "s1", None);
        let pointer = store.get(&inflight_key(&fp)).await.unwrap().unwrap();
        assert_eq!(body["debate_id"], pointer);
    }

    #[tokio::test]
    async fn blank_session_id_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _store) = test_state(&dir).await;

        let response = router(state)
            .oneshot(post_debate_request(&serde_json::json!({
                "topic": "Topic",
                "debater_1": "A",
                "debater_2": "B",
                "session_id": "  ",
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_session_id_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _store) = test_state(&dir).await;

        let response = router(state)
            .oneshot(post_debate_request(&serde_json::json!({
                "topic": "Topic",
                "debater_1": "A",
                "debater_2": "B",
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn held_lock_without_inflight_is_409() {
        let dir = tempfile::tempdir().unwrap();
        let (state, store) = test_state(&dir).await;

        let fp = build_fingerprint("Topic", "A", "B", "s1", None);
        store
            .set_nx_ex(&lock_key(&fp), "other", Duration::from_secs(60))
            .await
            .unwrap();

        let response = router(state)
            .oneshot(post_debate_request(&serde_json::json!({
                "topic": "Topic",
                "debater_1": "A",
                "debater_2": "B",
                "session_id": "s1",
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn inflight_duplicate_reports_joined_job() {
        let dir = tempfile::tempdir().unwrap();
        let (state, store) = test_state(&dir).await;

        let fp = build_fingerprint("Topic", "A", "B", "s1", None);
        store
            .set_nx_ex(&lock_key(&fp), "other", Duration::from_secs(60))
            .await
            .unwrap();
        store
            .set_ex(&inflight_key(&fp), "debate-222", Duration::from_secs(60))
            .await
            .unwrap();

        let response = router(state)
            .oneshot(post_debate_request(&serde_json::json!({
                "topic": "Topic",
                "debater_1": "A",
                "debater_2": "B",
                "session_id": "s1",
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["debate_id"], "debate-222");
        assert_eq!(body["cached"], false);
        assert_eq!(body["inflight"], true);
    }

    #[tokio::test]
    async fn events_endpoint_requires_session_id() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _store) = test_state(&dir).await;

        let response = router(state)
            .oneshot(
                Request::get("/debate/d1/events")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn events_endpoint_unknown_debate_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _store) = test_state(&dir).await;

        let response = router(state)
            .oneshot(
                Request::get("/debate/missing/events?session_id=s1")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn events_endpoint_enforces_ownership() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _store) = test_state(&dir).await;
        let app = router(state);

        let create = app
            .clone()
            .oneshot(post_debate_request(&serde_json::json!({
                "topic": "Topic",
                "debater_1": "A",
                "debater_2": "B",
                "session_id": "s1",
                "user_id": "u1",
            })))
            .await
            .unwrap();
        let debate_id = json_body(create).await["debate_id"]
            .as_str()
            .unwrap()
            .to_string();

        // Session-only credentials never reach a user-owned job.
        let forbidden = app
            .clone()
            .oneshot(
                Request::get(format!("/debate/{debate_id}/events?session_id=s1"))
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let allowed = app
            .oneshot(
                Request::get(format!(
                    "/debate/{debate_id}/events?session_id=other&user_id=u1"
                ))
                .body(axum::body::Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(allowed.status(), StatusCode::OK);
        assert_eq!(
            allowed
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("text/event-stream")
        );
    }
}
