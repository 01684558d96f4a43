// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value store trait backing the fingerprint cache, generation lock,
//! and inflight pointer.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::RostrumError;
use crate::traits::adapter::PluginAdapter;

/// Shared key-value store with TTL semantics.
///
/// The store's atomic conditional write ([`CacheStore::set_nx_ex`]) is the
/// sole source of mutual exclusion for generation locks; no client-side
/// mutex is used or would suffice across multiple processes. Entries past
/// their TTL are treated as absent.
#[async_trait]
pub trait CacheStore: PluginAdapter {
    /// Fetches the value for `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, RostrumError>;

    /// Unconditionally sets `key` to `value` with a TTL.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), RostrumError>;

    /// Atomic set-if-absent with a TTL. Returns `true` when this caller
    /// created the entry, `false` when a live entry already existed.
    async fn set_nx_ex(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, RostrumError>;

    /// Deletes `key` only when its current value equals `expected`.
    /// Returns `true` when a delete happened. Used for token-checked lock
    /// release; implementations may be check-then-delete rather than
    /// atomic, since the lock lease bounds the exposure.
    async fn del_if_eq(&self, key: &str, expected: &str) -> Result<bool, RostrumError>;
}
