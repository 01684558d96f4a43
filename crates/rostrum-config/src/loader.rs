// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Merge order: compiled defaults, then `rostrum.toml` in the working
//! directory, then `ROSTRUM_*` environment variable overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::RostrumConfig;

/// Load configuration from `rostrum.toml` with env var overrides.
pub fn load_config() -> Result<RostrumConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RostrumConfig::default()))
        .merge(Toml::file("rostrum.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<RostrumConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RostrumConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RostrumConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RostrumConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Environment variable provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so key names containing
/// underscores stay intact: `ROSTRUM_CACHE_LOCK_TTL_SECS` must map to
/// `cache.lock_ttl_secs`, not `cache.lock.ttl.secs`.
fn env_provider() -> Env {
    Env::prefixed("ROSTRUM_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("cache_", "cache.", 1)
            .replacen("session_", "session.", 1)
            .replacen("stream_", "stream.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.server.port, 8000);
        assert!(config.cache.enabled);
        assert!(config.cache.redis_url.is_empty());
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = load_config_from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9100

            [cache]
            enabled = false
            lock_ttl_secs = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9100);
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.lock_ttl_secs, 30);
        // Untouched sections keep their defaults.
        assert_eq!(config.session.ttl_secs, 86_400);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result = load_config_from_str(
            r#"
            [cache]
            enabld = true
            "#,
        );
        assert!(result.is_err(), "typo'd key should fail extraction");
    }
}
