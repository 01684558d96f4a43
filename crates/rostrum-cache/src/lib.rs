// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Kv and event-stream store backends for the Rostrum debate service.
//!
//! Two implementations of the `CacheStore` and `EventLog` traits: a
//! redis backend for shared deployments and an in-process memory backend
//! for tests and single-node runs. Both speak the same `debate:` key
//! namespace defined in [`keys`].

pub mod keys;
pub mod memory;
pub mod redis;

pub use memory::MemoryStore;
pub use self::redis::RedisStore;
