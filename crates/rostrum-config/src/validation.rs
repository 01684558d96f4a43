// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for loaded configuration.

use thiserror::Error;

use crate::model::RostrumConfig;

/// A configuration value that deserialized fine but is semantically wrong.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error at `{key}`: {message}")]
    Invalid { key: String, message: String },
}

/// Validate cross-field constraints Figment cannot express.
pub fn validate_config(config: &RostrumConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Invalid {
            key: "storage.database_path".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    if config.cache.enabled {
        if config.cache.lock_ttl_secs == 0 {
            errors.push(ConfigError::Invalid {
                key: "cache.lock_ttl_secs".to_string(),
                message: "must be positive when caching is enabled".to_string(),
            });
        }
        if config.cache.cache_ttl_secs == 0 {
            errors.push(ConfigError::Invalid {
                key: "cache.cache_ttl_secs".to_string(),
                message: "must be positive when caching is enabled".to_string(),
            });
        }
        if config.cache.inflight_ttl_secs == 0 {
            errors.push(ConfigError::Invalid {
                key: "cache.inflight_ttl_secs".to_string(),
                message: "must be positive when caching is enabled".to_string(),
            });
        }
    }

    if config.stream.max_events == 0 {
        errors.push(ConfigError::Invalid {
            key: "stream.max_events".to_string(),
            message: "event log cap must be positive".to_string(),
        });
    }

    if config.stream.keep_alive_secs == 0 {
        errors.push(ConfigError::Invalid {
            key: "stream.keep_alive_secs".to_string(),
            message: "keep-alive interval must be positive".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn default_config_validates() {
        let config = RostrumConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_lock_ttl_rejected_when_cache_enabled() {
        let config = load_config_from_str(
            r#"
            [cache]
            enabled = true
            lock_ttl_secs = 0
            "#,
        )
        .unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("lock_ttl_secs")));
    }

    #[test]
    fn zero_lock_ttl_allowed_when_cache_disabled() {
        let config = load_config_from_str(
            r#"
            [cache]
            enabled = false
            lock_ttl_secs = 0
            "#,
        )
        .unwrap();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_stream_cap_rejected() {
        let config = load_config_from_str(
            r#"
            [stream]
            max_events = 0
            "#,
        )
        .unwrap();
        assert!(validate_config(&config).is_err());
    }
}
