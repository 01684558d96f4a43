// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the MetadataStore trait.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use rostrum_config::model::StorageConfig;
use rostrum_core::traits::storage::NewDebate;
use rostrum_core::{
    AdapterType, Debate, DebateOwner, DebateStatus, HealthStatus, MetadataStore, PluginAdapter,
    RostrumError, Session,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed metadata store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`MetadataStore::initialize`].
pub struct SqliteMetadata {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteMetadata {
    /// Create a new SqliteMetadata with the given configuration.
    ///
    /// The database connection is not opened until `initialize` is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, RostrumError> {
        self.db.get().ok_or_else(|| RostrumError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteMetadata {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, RostrumError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RostrumError> {
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl MetadataStore for SqliteMetadata {
    async fn initialize(&self) -> Result<(), RostrumError> {
        let db = Database::open(&self.config.database_path).await?;
        self.db.set(db).map_err(|_| RostrumError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite metadata store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), RostrumError> {
        self.db()?.close().await
    }

    async fn upsert_session(
        &self,
        session_id: &str,
        user_id: Option<&str>,
        ttl: Duration,
    ) -> Result<(), RostrumError> {
        queries::sessions::upsert_session(self.db()?, session_id, user_id, ttl).await
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<Session>, RostrumError> {
        queries::sessions::get_session(self.db()?, session_id).await
    }

    async fn create_debate(&self, debate: &NewDebate) -> Result<(), RostrumError> {
        queries::debates::create_debate(self.db()?, debate).await
    }

    async fn get_debate(&self, debate_id: &str) -> Result<Option<Debate>, RostrumError> {
        queries::debates::get_debate(self.db()?, debate_id).await
    }

    async fn get_debate_owner(
        &self,
        debate_id: &str,
    ) -> Result<Option<DebateOwner>, RostrumError> {
        queries::debates::get_debate_owner(self.db()?, debate_id).await
    }

    async fn update_debate_status(
        &self,
        debate_id: &str,
        status: DebateStatus,
        error_message: Option<&str>,
    ) -> Result<(), RostrumError> {
        queries::debates::update_debate_status(self.db()?, debate_id, status, error_message).await
    }

    async fn is_authorized(
        &self,
        debate_id: &str,
        session_id: &str,
        user_id: Option<&str>,
    ) -> Result<bool, RostrumError> {
        queries::debates::is_authorized(self.db()?, debate_id, session_id, user_id).await
    }

    async fn sweep_expired_sessions(&self) -> Result<usize, RostrumError> {
        queries::sessions::sweep_expired_sessions(self.db()?).await
    }

    async fn sweep_old_debates(&self, max_age: Duration) -> Result<usize, RostrumError> {
        queries::debates::sweep_old_debates(self.db()?, max_age).await
    }
}
