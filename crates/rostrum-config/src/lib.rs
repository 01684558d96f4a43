// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Rostrum debate service.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), environment variable overrides, and
//! post-deserialization cross-field checks.

#![allow(clippy::result_large_err)] // figment::Error is external

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::RostrumConfig;
pub use validation::{ConfigError, validate_config};

/// Load configuration and validate it.
///
/// High-level entry point for the binary: loads from `rostrum.toml` + env
/// vars via Figment, then runs cross-field validation.
pub fn load_and_validate() -> Result<RostrumConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError::Invalid {
            key: "<figment>".to_string(),
            message: err.to_string(),
        }]),
    }
}
