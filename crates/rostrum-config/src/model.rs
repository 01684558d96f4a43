// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Rostrum debate service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Rostrum configuration.
///
/// Loaded from `rostrum.toml` with environment variable overrides. All
/// sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RostrumConfig {
    /// Service-level settings (logging).
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP server bind settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Metadata store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Fingerprint cache / generation lock settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Session lifecycle and debate retention settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Event log streaming settings.
    #[serde(default)]
    pub stream: StreamConfig,
}

/// Service-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP server bind configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Metadata store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "data/rostrum.db".to_string()
}

/// Fingerprint cache, generation lock, and inflight pointer configuration.
///
/// The three TTLs are independent and must satisfy: lock TTL >= time to
/// create a job and publish the inflight pointer; inflight TTL >= expected
/// generation duration; cache TTL is the reuse window (a product
/// decision).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Master switch. When disabled every request becomes a fresh job.
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// Redis connection URL. Empty selects the in-process memory store
    /// (single-process deployments and tests).
    #[serde(default)]
    pub redis_url: String,

    /// Reuse window for a resolved fingerprint -> debate_id entry.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Lease on the generation lock.
    #[serde(default = "default_lock_ttl_secs")]
    pub lock_ttl_secs: u64,

    /// Validity of the inflight pointer.
    #[serde(default = "default_inflight_ttl_secs")]
    pub inflight_ttl_secs: u64,

    /// Number of short polling waits while another caller holds the lock.
    #[serde(default = "default_wait_retries")]
    pub wait_retries: u32,

    /// Spacing between those polling waits, in milliseconds.
    #[serde(default = "default_wait_interval_ms")]
    pub wait_interval_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            redis_url: String::new(),
            cache_ttl_secs: default_cache_ttl_secs(),
            lock_ttl_secs: default_lock_ttl_secs(),
            inflight_ttl_secs: default_inflight_ttl_secs(),
            wait_retries: default_wait_retries(),
            wait_interval_ms: default_wait_interval_ms(),
        }
    }
}

impl CacheConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn lock_ttl(&self) -> Duration {
        Duration::from_secs(self.lock_ttl_secs)
    }

    pub fn inflight_ttl(&self) -> Duration {
        Duration::from_secs(self.inflight_ttl_secs)
    }

    pub fn wait_interval(&self) -> Duration {
        Duration::from_millis(self.wait_interval_ms)
    }
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_lock_ttl_secs() -> u64 {
    120
}

fn default_inflight_ttl_secs() -> u64 {
    900
}

fn default_wait_retries() -> u32 {
    2
}

fn default_wait_interval_ms() -> u64 {
    250
}

/// Session lifecycle and debate retention configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Session expiry extension applied on every request, in seconds.
    #[serde(default = "default_session_ttl_secs")]
    pub ttl_secs: u64,

    /// Age past which debate rows are purged, in seconds.
    #[serde(default = "default_debate_retention_secs")]
    pub debate_retention_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_session_ttl_secs(),
            debate_retention_secs: default_debate_retention_secs(),
        }
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn debate_retention(&self) -> Duration {
        Duration::from_secs(self.debate_retention_secs)
    }
}

fn default_session_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_debate_retention_secs() -> u64 {
    7 * 24 * 60 * 60
}

/// Event log streaming configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StreamConfig {
    /// Idle interval after which a synthetic keep-alive is emitted, in
    /// seconds. Also the per-pull blocking-read bound.
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,

    /// Maximum retained records per job log; oldest are discarded beyond
    /// this cap.
    #[serde(default = "default_max_events")]
    pub max_events: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            keep_alive_secs: default_keep_alive_secs(),
            max_events: default_max_events(),
        }
    }
}

impl StreamConfig {
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }
}

fn default_keep_alive_secs() -> u64 {
    10
}

fn default_max_events() -> usize {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_retention_policy() {
        let config = RostrumConfig::default();
        assert_eq!(config.session.ttl_secs, 86_400);
        assert_eq!(config.session.debate_retention_secs, 604_800);
        assert_eq!(config.stream.max_events, 1000);
    }

    #[test]
    fn cache_defaults_satisfy_ttl_ordering() {
        let cache = CacheConfig::default();
        // Lock must outlive job creation; inflight must outlive generation.
        assert!(cache.lock_ttl_secs >= 60);
        assert!(cache.inflight_ttl_secs >= cache.lock_ttl_secs);
        assert_eq!(cache.wait_retries, 2);
        assert!(cache.wait_interval_ms < 1000);
    }

    #[test]
    fn duration_helpers() {
        let cache = CacheConfig::default();
        assert_eq!(cache.lock_ttl(), Duration::from_secs(120));
        assert_eq!(cache.wait_interval(), Duration::from_millis(250));
    }
}
