// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the Rostrum service.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility. The backing stores
//! are injected through these traits so tests can substitute fakes.

pub mod adapter;
pub mod cache;
pub mod engine;
pub mod events;
pub mod storage;

// Re-export all traits at the traits module level for convenience.
pub use adapter::PluginAdapter;
pub use cache::CacheStore;
pub use engine::DebateEngine;
pub use events::EventLog;
pub use storage::MetadataStore;
