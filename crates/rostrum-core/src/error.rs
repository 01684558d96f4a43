// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Rostrum debate service.

use thiserror::Error;

/// The primary error type used across all Rostrum adapter traits and core operations.
#[derive(Debug, Error)]
pub enum RostrumError {
    /// A required request field is missing or blank. Detected before any store access.
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested debate does not exist.
    #[error("debate not found: {debate_id}")]
    NotFound { debate_id: String },

    /// The presented credential does not match the debate's owner.
    #[error("credential does not match debate ownership")]
    Forbidden,

    /// A write violated a uniqueness or state-transition invariant.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The generation lock is held and no inflight pointer appeared within
    /// the wait budget. The caller should retry later.
    #[error("generation already in progress, retry later")]
    Busy,

    /// Cache/lock store errors (redis unreachable, protocol failure).
    /// The coordinator absorbs these and degrades to always-proceed.
    #[error("cache store error: {source}")]
    Cache {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Metadata store errors (database connection, query failure). Fatal to
    /// the request: debate rows must be durable.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Transport/server errors (bind failure, serve failure).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
