// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redis store backend.
//!
//! Kv operations run through a shared [`ConnectionManager`]. Blocking
//! stream reads open a dedicated multiplexed connection per call so a
//! parked XREAD never stalls lock and cache traffic on the shared
//! connection.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use redis::streams::StreamReadReply;
use tracing::debug;

use rostrum_core::{
    AdapterType, CacheStore, EventLog, EventRecord, HealthStatus, PluginAdapter, RostrumError,
};

use crate::keys::stream_key;

const READ_BATCH: usize = 100;

fn map_redis_err(e: redis::RedisError) -> RostrumError {
    RostrumError::Cache {
        source: Box::new(e),
    }
}

/// Stream cursors are `ms-seq` entry ids or a bare number (`0` for the
/// start of the log). Checked before XREAD so a bad cursor surfaces as a
/// validation error rather than a server reply error.
fn valid_stream_cursor(cursor: &str) -> bool {
    match cursor.split_once('-') {
        Some((ms, seq)) => ms.parse::<u64>().is_ok() && seq.parse::<u64>().is_ok(),
        None => cursor.parse::<u64>().is_ok(),
    }
}

/// Redis-backed kv + event-log store.
pub struct RedisStore {
    client: redis::Client,
    manager: ConnectionManager,
    max_events: usize,
}

impl RedisStore {
    /// Connect to redis at `url`. Per-job event logs are trimmed to
    /// roughly `max_events` records on append.
    pub async fn connect(url: &str, max_events: usize) -> Result<Self, RostrumError> {
        let client = redis::Client::open(url).map_err(map_redis_err)?;
        let manager = ConnectionManager::new(client.clone())
            .await
            .map_err(map_redis_err)?;
        debug!(%url, "connected to redis");
        Ok(Self {
            client,
            manager,
            max_events,
        })
    }

    fn ttl_secs(ttl: Duration) -> u64 {
        // EX 0 is a protocol error; round sub-second leases up.
        ttl.as_secs().max(1)
    }
}

#[async_trait]
impl PluginAdapter for RedisStore {
    fn name(&self) -> &str {
        "redis"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Cache
    }

    async fn health_check(&self) -> Result<HealthStatus, RostrumError> {
        let mut conn = self.manager.clone();
        redis::cmd("PING")
            .query_async::<()>(&mut conn)
            .await
            .map_err(map_redis_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RostrumError> {
        Ok(())
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RostrumError> {
        let mut conn = self.manager.clone();
        conn.get(key).await.map_err(map_redis_err)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), RostrumError> {
        let mut conn = self.manager.clone();
        conn.set_ex(key, value, Self::ttl_secs(ttl))
            .await
            .map_err(map_redis_err)
    }

    async fn set_nx_ex(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, RostrumError> {
        let mut conn = self.manager.clone();
        // SET NX EX replies OK on acquisition and nil when the key lives.
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(Self::ttl_secs(ttl))
            .query_async(&mut conn)
            .await
            .map_err(map_redis_err)?;
        Ok(reply.is_some())
    }

    async fn del_if_eq(&self, key: &str, expected: &str) -> Result<bool, RostrumError> {
        // Check-then-delete; the lock lease bounds the race window.
        let mut conn = self.manager.clone();
        let current: Option<String> = conn.get(key).await.map_err(map_redis_err)?;
        if current.as_deref() == Some(expected) {
            conn.del::<_, ()>(key).await.map_err(map_redis_err)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[async_trait]
impl EventLog for RedisStore {
    async fn publish(
        &self,
        job_id: &str,
        kind: &str,
        payload: &str,
    ) -> Result<String, RostrumError> {
        let mut conn = self.manager.clone();
        let id: String = redis::cmd("XADD")
            .arg(stream_key(job_id))
            .arg("MAXLEN")
            .arg("~")
            .arg(self.max_events)
            .arg("*")
            .arg("event")
            .arg(kind)
            .arg("data")
            .arg(payload)
            .query_async(&mut conn)
            .await
            .map_err(map_redis_err)?;
        Ok(id)
    }

    async fn read_after(
        &self,
        job_id: &str,
        cursor: &str,
        wait: Duration,
    ) -> Result<Vec<EventRecord>, RostrumError> {
        if !valid_stream_cursor(cursor) {
            return Err(RostrumError::Validation(format!(
                "invalid cursor: {cursor}"
            )));
        }
        // Dedicated connection: XREAD BLOCK parks the whole connection.
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(map_redis_err)?;
        let reply: Option<StreamReadReply> = redis::cmd("XREAD")
            .arg("COUNT")
            .arg(READ_BATCH)
            .arg("BLOCK")
            .arg(wait.as_millis() as u64)
            .arg("STREAMS")
            .arg(stream_key(job_id))
            .arg(cursor)
            .query_async(&mut conn)
            .await
            .map_err(map_redis_err)?;

        let mut records = Vec::new();
        if let Some(reply) = reply {
            for stream in reply.keys {
                for entry in stream.ids {
                    let kind: String = entry.get("event").unwrap_or_default();
                    let payload: String = entry.get("data").unwrap_or_default();
                    records.push(EventRecord {
                        cursor: entry.id.clone(),
                        kind,
                        payload,
                    });
                }
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::valid_stream_cursor;

    #[test]
    fn cursor_validation_accepts_entry_ids_and_start() {
        assert!(valid_stream_cursor("0"));
        assert!(valid_stream_cursor("1726000000000-0"));
        assert!(valid_stream_cursor("42"));

        assert!(!valid_stream_cursor(""));
        assert!(!valid_stream_cursor("not-a-cursor"));
        assert!(!valid_stream_cursor("123-"));
        assert!(!valid_stream_cursor("-1"));
    }
}
