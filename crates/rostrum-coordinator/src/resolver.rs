// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thundering-herd guard for duplicate generation requests.
//!
//! The lock gives exclusivity of creation; the inflight pointer is the
//! fast path letting followers learn the winner's job id; the bounded
//! poll keeps followers from stampeding into rejection. Any cache-store
//! failure degrades to [`Resolution::Proceed`]: generation correctness
//! never depends on the cache being up.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use rostrum_cache::keys::{cache_key, inflight_key, lock_key};
use rostrum_config::model::CacheConfig;
use rostrum_core::CacheStore;

/// Outcome of resolving one request against the fingerprint cache and
/// generation lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A live cache entry maps this fingerprint to an existing job.
    CachedHit { debate_id: String },
    /// Another caller is creating the job right now; its id is known.
    InflightDuplicate { debate_id: String },
    /// This caller won creation rights. The token is `None` when caching
    /// is disabled or unavailable (nothing to release later).
    Proceed { lock_token: Option<String> },
    /// Lock held with no inflight pointer after the wait budget. The
    /// caller should retry later.
    Rejected,
}

enum LockAttempt {
    Acquired,
    Held,
    Unavailable,
}

/// Fingerprint cache and generation-lock coordinator.
pub struct LockCoordinator {
    cache: Arc<dyn CacheStore>,
    config: CacheConfig,
}

impl LockCoordinator {
    pub fn new(cache: Arc<dyn CacheStore>, config: CacheConfig) -> Self {
        Self { cache, config }
    }

    /// Resolve a fingerprint to a reuse decision. Infallible: every
    /// cache-store error path collapses into `Proceed`.
    pub async fn resolve(&self, fingerprint: &str) -> Resolution {
        if !self.config.enabled {
            return Resolution::Proceed { lock_token: None };
        }

        if let Some(debate_id) = self.get_quiet(&cache_key(fingerprint)).await {
            debug!(%fingerprint, %debate_id, "fingerprint cache hit");
            return Resolution::CachedHit { debate_id };
        }

        let token = Uuid::new_v4().to_string();
        match self.try_lock(fingerprint, &token).await {
            LockAttempt::Acquired => {
                return Resolution::Proceed {
                    lock_token: Some(token),
                };
            }
            LockAttempt::Unavailable => {
                return Resolution::Proceed { lock_token: None };
            }
            LockAttempt::Held => {}
        }

        if let Some(debate_id) = self.get_quiet(&inflight_key(fingerprint)).await {
            return Resolution::InflightDuplicate { debate_id };
        }

        // The winner holds the lock but has not published the inflight
        // pointer yet. Poll briefly, re-checking cache then inflight.
        for _ in 0..self.config.wait_retries {
            tokio::time::sleep(self.config.wait_interval()).await;
            if let Some(debate_id) = self.get_quiet(&cache_key(fingerprint)).await {
                return Resolution::CachedHit { debate_id };
            }
            if let Some(debate_id) = self.get_quiet(&inflight_key(fingerprint)).await {
                return Resolution::InflightDuplicate { debate_id };
            }
        }

        // The original holder's lease may have lapsed by now.
        match self.try_lock(fingerprint, &token).await {
            LockAttempt::Acquired => Resolution::Proceed {
                lock_token: Some(token),
            },
            LockAttempt::Unavailable => Resolution::Proceed { lock_token: None },
            LockAttempt::Held => Resolution::Rejected,
        }
    }

    /// Publish the fingerprint -> job mapping after the winner has
    /// durably created the row, then release the lock. Best effort: a
    /// failure here only weakens dedup, never the created job.
    pub async fn record_job(&self, fingerprint: &str, debate_id: &str, lock_token: Option<&str>) {
        if !self.config.enabled {
            return;
        }
        if let Err(e) = self
            .cache
            .set_ex(&cache_key(fingerprint), debate_id, self.config.cache_ttl())
            .await
        {
            warn!(%fingerprint, error = %e, "failed to publish cache entry");
        }
        if let Err(e) = self
            .cache
            .set_ex(
                &inflight_key(fingerprint),
                debate_id,
                self.config.inflight_ttl(),
            )
            .await
        {
            warn!(%fingerprint, error = %e, "failed to publish inflight pointer");
        }
        if let Some(token) = lock_token {
            self.release_lock(fingerprint, token).await;
        }
    }

    /// Token-checked early lock release. Best effort; the lease expires
    /// on its own otherwise.
    pub async fn release_lock(&self, fingerprint: &str, token: &str) {
        if let Err(e) = self.cache.del_if_eq(&lock_key(fingerprint), token).await {
            warn!(%fingerprint, error = %e, "failed to release generation lock");
        }
    }

    async fn get_quiet(&self, key: &str) -> Option<String> {
        match self.cache.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(%key, error = %e, "cache read failed, treating as miss");
                None
            }
        }
    }

    async fn try_lock(&self, fingerprint: &str, token: &str) -> LockAttempt {
        match self
            .cache
            .set_nx_ex(&lock_key(fingerprint), token, self.config.lock_ttl())
            .await
        {
            Ok(true) => LockAttempt::Acquired,
            Ok(false) => LockAttempt::Held,
            Err(e) => {
                warn!(%fingerprint, error = %e, "lock store unavailable, proceeding uncached");
                LockAttempt::Unavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use rostrum_cache::MemoryStore;
    use rostrum_core::RostrumError;

    fn fast_config() -> CacheConfig {
        CacheConfig {
            wait_retries: 2,
            wait_interval_ms: 5,
            ..CacheConfig::default()
        }
    }

    fn coordinator(store: Arc<MemoryStore>, config: CacheConfig) -> LockCoordinator {
        LockCoordinator::new(store, config)
    }

    #[tokio::test]
    async fn disabled_cache_always_proceeds_without_token() {
        let store = Arc::new(MemoryStore::new(16));
        let coord = coordinator(
            store,
            CacheConfig {
                enabled: false,
                ..fast_config()
            },
        );
        assert_eq!(
            coord.resolve("fp").await,
            Resolution::Proceed { lock_token: None }
        );
    }

    #[tokio::test]
    async fn cache_hit_short_circuits() {
        let store = Arc::new(MemoryStore::new(16));
        store
            .set_ex(&cache_key("fp"), "debate-111", Duration::from_secs(60))
            .await
            .unwrap();
        let coord = coordinator(store, fast_config());
        assert_eq!(
            coord.resolve("fp").await,
            Resolution::CachedHit {
                debate_id: "debate-111".to_string()
            }
        );
    }

    #[tokio::test]
    async fn miss_acquires_lock_and_proceeds() {
        let store = Arc::new(MemoryStore::new(16));
        let coord = coordinator(Arc::clone(&store), fast_config());
        match coord.resolve("fp").await {
            Resolution::Proceed {
                lock_token: Some(token),
            } => {
                // The lock entry now carries this caller's token.
                let held = store.get(&lock_key("fp")).await.unwrap();
                assert_eq!(held.as_deref(), Some(token.as_str()));
            }
            other => panic!("expected Proceed with token, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn held_lock_with_inflight_pointer_returns_duplicate() {
        let store = Arc::new(MemoryStore::new(16));
        store
            .set_nx_ex(&lock_key("fp"), "other", Duration::from_secs(60))
            .await
            .unwrap();
        store
            .set_ex(&inflight_key("fp"), "debate-222", Duration::from_secs(60))
            .await
            .unwrap();
        let coord = coordinator(store, fast_config());
        assert_eq!(
            coord.resolve("fp").await,
            Resolution::InflightDuplicate {
                debate_id: "debate-222".to_string()
            }
        );
    }

    #[tokio::test]
    async fn held_lock_with_no_inflight_rejects_after_wait_budget() {
        let store = Arc::new(MemoryStore::new(16));
        store
            .set_nx_ex(&lock_key("fp"), "other", Duration::from_secs(60))
            .await
            .unwrap();
        let coord = coordinator(store, fast_config());
        assert_eq!(coord.resolve("fp").await, Resolution::Rejected);
    }

    #[tokio::test]
    async fn follower_picks_up_inflight_pointer_published_mid_wait() {
        let store = Arc::new(MemoryStore::new(16));
        store
            .set_nx_ex(&lock_key("fp"), "other", Duration::from_secs(60))
            .await
            .unwrap();
        let coord = coordinator(
            Arc::clone(&store),
            CacheConfig {
                wait_retries: 5,
                wait_interval_ms: 10,
                ..CacheConfig::default()
            },
        );

        let publisher = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(15)).await;
            store
                .set_ex(&inflight_key("fp"), "debate-333", Duration::from_secs(60))
                .await
                .unwrap();
        });

        assert_eq!(
            coord.resolve("fp").await,
            Resolution::InflightDuplicate {
                debate_id: "debate-333".to_string()
            }
        );
        publisher.await.unwrap();
    }

    #[tokio::test]
    async fn lapsed_lease_is_reacquired_on_final_attempt() {
        let store = Arc::new(MemoryStore::new(16));
        // A lease that expires before the wait budget runs out.
        store
            .set_nx_ex(&lock_key("fp"), "other", Duration::from_millis(1))
            .await
            .unwrap();
        let coord = coordinator(store, fast_config());
        match coord.resolve("fp").await {
            Resolution::Proceed { lock_token: Some(_) } => {}
            other => panic!("expected reacquired Proceed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn record_job_publishes_cache_and_inflight_and_releases_lock() {
        let store = Arc::new(MemoryStore::new(16));
        let coord = coordinator(Arc::clone(&store), fast_config());

        let token = match coord.resolve("fp").await {
            Resolution::Proceed {
                lock_token: Some(token),
            } => token,
            other => panic!("expected Proceed, got {other:?}"),
        };

        coord.record_job("fp", "debate-444", Some(&token)).await;

        assert_eq!(
            store.get(&cache_key("fp")).await.unwrap().as_deref(),
            Some("debate-444")
        );
        assert_eq!(
            store.get(&inflight_key("fp")).await.unwrap().as_deref(),
            Some("debate-444")
        );
        assert_eq!(store.get(&lock_key("fp")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn release_lock_leaves_foreign_token_in_place() {
        let store = Arc::new(MemoryStore::new(16));
        store
            .set_nx_ex(&lock_key("fp"), "other", Duration::from_secs(60))
            .await
            .unwrap();
        let coord = coordinator(Arc::clone(&store), fast_config());

        coord.release_lock("fp", "mine").await;
        assert_eq!(
            store.get(&lock_key("fp")).await.unwrap().as_deref(),
            Some("other")
        );
    }

    struct FailingStore;

    #[async_trait::async_trait]
    impl rostrum_core::PluginAdapter for FailingStore {
        fn name(&self) -> &str {
            "failing"
        }
        fn version(&self) -> semver::Version {
            semver::Version::new(0, 0, 0)
        }
        fn adapter_type(&self) -> rostrum_core::AdapterType {
            rostrum_core::AdapterType::Cache
        }
        async fn health_check(&self) -> Result<rostrum_core::HealthStatus, RostrumError> {
            Ok(rostrum_core::HealthStatus::Unhealthy("down".to_string()))
        }
        async fn shutdown(&self) -> Result<(), RostrumError> {
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl CacheStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, RostrumError> {
            Err(RostrumError::Cache {
                source: "connection refused".into(),
            })
        }
        async fn set_ex(
            &self,
            _key: &str,
            _value: &str,
            _ttl: Duration,
        ) -> Result<(), RostrumError> {
            Err(RostrumError::Cache {
                source: "connection refused".into(),
            })
        }
        async fn set_nx_ex(
            &self,
            _key: &str,
            _value: &str,
            _ttl: Duration,
        ) -> Result<bool, RostrumError> {
            Err(RostrumError::Cache {
                source: "connection refused".into(),
            })
        }
        async fn del_if_eq(&self, _key: &str, _expected: &str) -> Result<bool, RostrumError> {
            Err(RostrumError::Cache {
                source: "connection refused".into(),
            })
        }
    }

    #[tokio::test]
    async fn unreachable_store_fails_open_to_proceed() {
        let coord = LockCoordinator::new(Arc::new(FailingStore), fast_config());
        assert_eq!(
            coord.resolve("fp").await,
            Resolution::Proceed { lock_token: None }
        );
    }
}
