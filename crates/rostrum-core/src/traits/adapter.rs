// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that all injected store/engine handles implement.

use async_trait::async_trait;

use crate::error::RostrumError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for all Rostrum adapters.
///
/// Every adapter (metadata store, cache store, engine) implements this
/// trait, which provides identity, lifecycle, and health check
/// capabilities. Adapters are explicitly constructed at process start and
/// shut down at process exit, never ambient singletons.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the type of adapter (storage, cache, engine).
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, RostrumError>;

    /// Gracefully shuts down the adapter, releasing any held resources.
    async fn shutdown(&self) -> Result<(), RostrumError>;
}
