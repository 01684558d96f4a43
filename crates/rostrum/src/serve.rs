// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rostrum serve` command implementation.
//!
//! Wires the metadata store, the cache/event store, the coordinator,
//! and the gateway together with an explicit lifecycle: open at process
//! start, close on shutdown, no ambient singletons.

use std::sync::Arc;

use tracing::{error, info};

use rostrum_cache::{MemoryStore, RedisStore};
use rostrum_config::RostrumConfig;
use rostrum_coordinator::DebateService;
use rostrum_core::{CacheStore, EventLog, MetadataStore, RostrumError};
use rostrum_gateway::GatewayState;
use rostrum_storage::SqliteMetadata;

use crate::engine::ScriptedEngine;

/// Runs the `rostrum serve` command until interrupted.
pub async fn run_serve(config: RostrumConfig) -> Result<(), RostrumError> {
    init_tracing(&config.service.log_level);

    info!("starting rostrum serve");

    let storage: Arc<dyn MetadataStore> =
        Arc::new(SqliteMetadata::new(config.storage.clone()));
    storage.initialize().await?;

    let (cache, events) = connect_store(&config).await?;

    let engine = Arc::new(ScriptedEngine::new(
        Arc::clone(&events),
        Arc::clone(&storage),
    ));
    let service = Arc::new(DebateService::new(
        Arc::clone(&storage),
        cache,
        engine,
        config.cache.clone(),
        config.session.clone(),
    ));

    let state = GatewayState {
        service,
        events,
        stream: config.stream.clone(),
    };

    tokio::select! {
        result = rostrum_gateway::start_server(&config.server, state) => {
            if let Err(e) = &result {
                error!(error = %e, "gateway exited");
            }
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    storage.shutdown().await?;
    info!("rostrum serve shutdown complete");
    Ok(())
}

/// Pick the kv/event store backend: redis when a URL is configured,
/// else the in-process memory store.
async fn connect_store(
    config: &RostrumConfig,
) -> Result<(Arc<dyn CacheStore>, Arc<dyn EventLog>), RostrumError> {
    if config.cache.redis_url.is_empty() {
        info!("no redis_url configured, using in-process store");
        let store = Arc::new(MemoryStore::new(config.stream.max_events));
        let cache: Arc<dyn CacheStore> = store.clone();
        let events: Arc<dyn EventLog> = store;
        Ok((cache, events))
    } else {
        let store = Arc::new(
            RedisStore::connect(&config.cache.redis_url, config.stream.max_events).await?,
        );
        let cache: Arc<dyn CacheStore> = store.clone();
        let events: Arc<dyn EventLog> = store;
        Ok((cache, events))
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rostrum={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
