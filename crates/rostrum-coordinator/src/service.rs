// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Debate orchestration: the create and authorize flows.
//!
//! `create_debate` ties the pieces together: session upsert,
//! opportunistic retention sweeps, fingerprint resolution, the durable
//! row insert, dedup publication, and the detached engine handoff.

use std::sync::Arc;

use tracing::{debug, error, warn};
use uuid::Uuid;

use rostrum_config::model::{CacheConfig, SessionConfig};
use rostrum_core::traits::storage::NewDebate;
use rostrum_core::{
    CacheStore, DebateEngine, DebateSpec, DebateStatus, MetadataStore, RostrumError,
};

use crate::fingerprint::build_fingerprint;
use crate::resolver::{LockCoordinator, Resolution};

/// One inbound create request, validated before any store access.
#[derive(Debug, Clone)]
pub struct CreateDebateRequest {
    pub topic: String,
    pub debater_1: String,
    pub debater_2: String,
    pub session_id: String,
    pub user_id: Option<String>,
}

/// What the caller learns from a create: the job id and how it was
/// obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    pub debate_id: String,
    /// Served from a live fingerprint cache entry.
    pub cached: bool,
    /// Another caller's in-progress job was joined instead.
    pub inflight: bool,
}

/// Coordination facade over the metadata store, the fingerprint cache,
/// and the workflow engine.
pub struct DebateService {
    storage: Arc<dyn MetadataStore>,
    coordinator: LockCoordinator,
    engine: Arc<dyn DebateEngine>,
    session_config: SessionConfig,
}

impl DebateService {
    pub fn new(
        storage: Arc<dyn MetadataStore>,
        cache: Arc<dyn CacheStore>,
        engine: Arc<dyn DebateEngine>,
        cache_config: CacheConfig,
        session_config: SessionConfig,
    ) -> Self {
        Self {
            storage,
            coordinator: LockCoordinator::new(cache, cache_config),
            engine,
            session_config,
        }
    }

    /// Create or reuse a debate job for this request.
    ///
    /// Returns [`RostrumError::Validation`] on blank required fields,
    /// [`RostrumError::Busy`] when the generation lock is held with no
    /// inflight pointer, and storage errors verbatim (job rows must be
    /// durable).
    pub async fn create_debate(
        &self,
        request: CreateDebateRequest,
    ) -> Result<CreateOutcome, RostrumError> {
        validate_request(&request)?;
        let session_id = request.session_id.trim();
        let user_id = request.user_id.as_deref().map(str::trim).filter(|u| !u.is_empty());

        self.storage
            .upsert_session(session_id, user_id, self.session_config.ttl())
            .await?;
        self.sweep_opportunistically().await;

        let fingerprint = build_fingerprint(
            &request.topic,
            &request.debater_1,
            &request.debater_2,
            session_id,
            user_id,
        );

        match self.coordinator.resolve(&fingerprint).await {
            Resolution::CachedHit { debate_id } => Ok(CreateOutcome {
                debate_id,
                cached: true,
                inflight: false,
            }),
            Resolution::InflightDuplicate { debate_id } => Ok(CreateOutcome {
                debate_id,
                cached: false,
                inflight: true,
            }),
            Resolution::Rejected => Err(RostrumError::Busy),
            Resolution::Proceed { lock_token } => {
                self.create_fresh(&request, session_id, user_id, &fingerprint, lock_token)
                    .await
            }
        }
    }

    /// Check that the presented credential may read this job's event
    /// stream.
    pub async fn authorize_stream(
        &self,
        debate_id: &str,
        session_id: &str,
        user_id: Option<&str>,
    ) -> Result<(), RostrumError> {
        if session_id.trim().is_empty() {
            return Err(RostrumError::Validation(
                "session_id must not be blank".to_string(),
            ));
        }
        let owner = self
            .storage
            .get_debate_owner(debate_id)
            .await?
            .ok_or_else(|| RostrumError::NotFound {
                debate_id: debate_id.to_string(),
            })?;
        if owner.matches(session_id.trim(), user_id.map(str::trim).filter(|u| !u.is_empty())) {
            Ok(())
        } else {
            Err(RostrumError::Forbidden)
        }
    }

    async fn create_fresh(
        &self,
        request: &CreateDebateRequest,
        session_id: &str,
        user_id: Option<&str>,
        fingerprint: &str,
        lock_token: Option<String>,
    ) -> Result<CreateOutcome, RostrumError> {
        let debate_id = Uuid::new_v4().to_string();
        let new = NewDebate {
            debate_id: debate_id.clone(),
            session_id: session_id.to_string(),
            user_id: user_id.map(str::to_string),
            topic: request.topic.clone(),
            debater_1: request.debater_1.clone(),
            debater_2: request.debater_2.clone(),
        };

        if let Err(e) = self.storage.create_debate(&new).await {
            if let Some(token) = lock_token.as_deref() {
                self.coordinator.release_lock(fingerprint, token).await;
            }
            return Err(e);
        }

        self.coordinator
            .record_job(fingerprint, &debate_id, lock_token.as_deref())
            .await;

        self.spawn_engine(DebateSpec {
            debate_id: debate_id.clone(),
            topic: request.topic.clone(),
            debater_1: request.debater_1.clone(),
            debater_2: request.debater_2.clone(),
        });

        Ok(CreateOutcome {
            debate_id,
            cached: false,
            inflight: false,
        })
    }

    /// Hand the job to the engine on a detached task. The request
    /// returns immediately; the engine reports terminal status through
    /// the metadata store.
    fn spawn_engine(&self, spec: DebateSpec) {
        let engine = Arc::clone(&self.engine);
        let storage = Arc::clone(&self.storage);
        tokio::spawn(async move {
            let debate_id = spec.debate_id.clone();
            if let Err(e) = engine.run(spec).await {
                error!(%debate_id, error = %e, "engine run failed");
                if let Err(e) = storage
                    .update_debate_status(&debate_id, DebateStatus::Failed, Some(&e.to_string()))
                    .await
                {
                    // Conflict here means the engine already recorded
                    // its own terminal status.
                    debug!(%debate_id, error = %e, "terminal status not recorded");
                }
            }
        });
    }

    /// Request-path retention pass. Sweep failures are logged and
    /// dropped; they never fail the request that triggered them.
    async fn sweep_opportunistically(&self) {
        match self.storage.sweep_expired_sessions().await {
            Ok(0) => {}
            Ok(n) => debug!(swept = n, "expired sessions removed"),
            Err(e) => warn!(error = %e, "session sweep failed"),
        }
        match self
            .storage
            .sweep_old_debates(self.session_config.debate_retention())
            .await
        {
            Ok(0) => {}
            Ok(n) => debug!(swept = n, "old debates removed"),
            Err(e) => warn!(error = %e, "debate sweep failed"),
        }
    }
}

fn validate_request(request: &CreateDebateRequest) -> Result<(), RostrumError> {
    if request.session_id.trim().is_empty() {
        return Err(RostrumError::Validation(
            "session_id must not be blank".to_string(),
        ));
    }
    for (field, value) in [
        ("topic", &request.topic),
        ("debater_1", &request.debater_1),
        ("debater_2", &request.debater_2),
    ] {
        if value.trim().is_empty() {
            return Err(RostrumError::Validation(format!(
                "{field} must not be blank"
            )));
        }
    }
    Ok(())
}
