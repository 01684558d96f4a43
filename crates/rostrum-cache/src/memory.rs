// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process store backend.
//!
//! Implements both `CacheStore` and `EventLog` against process memory:
//! a dashmap with lazy TTL expiry for the kv side, and per-job ring
//! buffers with `Notify`-based wakeups for the event-log side. Used by
//! tests as the injected fake and by single-process deployments with no
//! redis configured. Mutual exclusion only holds within one process here.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::{Mutex, Notify};

use rostrum_core::{
    AdapterType, CacheStore, EventLog, EventRecord, HealthStatus, PluginAdapter, RostrumError,
};

struct KvEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl KvEntry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

struct StreamState {
    records: Mutex<VecDeque<(u64, String, String)>>,
    next_seq: AtomicU64,
    notify: Notify,
}

impl StreamState {
    fn new() -> Self {
        Self {
            records: Mutex::new(VecDeque::new()),
            next_seq: AtomicU64::new(1),
            notify: Notify::new(),
        }
    }
}

/// In-memory kv + event-log store.
pub struct MemoryStore {
    kv: DashMap<String, KvEntry>,
    streams: DashMap<String, Arc<StreamState>>,
    max_events: usize,
}

impl MemoryStore {
    /// Create a store whose per-job logs retain at most `max_events`
    /// records.
    pub fn new(max_events: usize) -> Self {
        Self {
            kv: DashMap::new(),
            streams: DashMap::new(),
            max_events,
        }
    }

    fn stream(&self, job_id: &str) -> Arc<StreamState> {
        self.streams
            .entry(job_id.to_string())
            .or_insert_with(|| Arc::new(StreamState::new()))
            .clone()
    }
}

#[async_trait]
impl PluginAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Cache
    }

    async fn health_check(&self) -> Result<HealthStatus, RostrumError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RostrumError> {
        Ok(())
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RostrumError> {
        if let Some(entry) = self.kv.get(key) {
            if !entry.is_expired() {
                return Ok(Some(entry.value.clone()));
            }
        }
        // Lazy expiry: drop the dead entry on the way out.
        self.kv.remove_if(key, |_, v| v.is_expired());
        Ok(None)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), RostrumError> {
        self.kv.insert(
            key.to_string(),
            KvEntry {
                value: value.to_string(),
                expires_at: Some(Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn set_nx_ex(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, RostrumError> {
        // The dashmap entry guard serializes concurrent callers on this key.
        let mut entry = self
            .kv
            .entry(key.to_string())
            .or_insert_with(|| KvEntry {
                value: String::new(),
                expires_at: Some(Instant::now()),
            });
        if entry.is_expired() {
            *entry.value_mut() = KvEntry {
                value: value.to_string(),
                expires_at: Some(Instant::now() + ttl),
            };
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn del_if_eq(&self, key: &str, expected: &str) -> Result<bool, RostrumError> {
        Ok(self
            .kv
            .remove_if(key, |_, v| !v.is_expired() && v.value == expected)
            .is_some())
    }
}

#[async_trait]
impl EventLog for MemoryStore {
    async fn publish(
        &self,
        job_id: &str,
        kind: &str,
        payload: &str,
    ) -> Result<String, RostrumError> {
        let state = self.stream(job_id);
        let seq = state.next_seq.fetch_add(1, Ordering::SeqCst);
        {
            let mut records = state.records.lock().await;
            records.push_back((seq, kind.to_string(), payload.to_string()));
            while records.len() > self.max_events {
                records.pop_front();
            }
        }
        state.notify.notify_waiters();
        Ok(seq.to_string())
    }

    async fn read_after(
        &self,
        job_id: &str,
        cursor: &str,
        wait: Duration,
    ) -> Result<Vec<EventRecord>, RostrumError> {
        let after: u64 = cursor
            .parse()
            .map_err(|_| RostrumError::Validation(format!("invalid cursor: {cursor}")))?;
        let state = self.stream(job_id);
        let deadline = Instant::now() + wait;

        loop {
            // Register for wakeups before checking, so an append between
            // the check and the await is not missed.
            let notified = state.notify.notified();

            let batch: Vec<EventRecord> = {
                let records = state.records.lock().await;
                records
                    .iter()
                    .filter(|(seq, _, _)| *seq > after)
                    .map(|(seq, kind, payload)| EventRecord {
                        cursor: seq.to_string(),
                        kind: kind.clone(),
                        payload: payload.clone(),
                    })
                    .collect()
            };
            if !batch.is_empty() {
                return Ok(batch);
            }

            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                return Ok(Vec::new());
            };
            if tokio::time::timeout(remaining, notified).await.is_err() {
                return Ok(Vec::new());
            }
        }
    }
}
