// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Rostrum debate service.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Rostrum workspace. The backing stores
//! and the workflow engine are injected through the traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::RostrumError;
pub use types::{
    AdapterType, Debate, DebateOwner, DebateSpec, DebateStatus, EventRecord, HealthStatus,
    Session,
};

// Re-export all adapter traits at crate root.
pub use traits::{CacheStore, DebateEngine, EventLog, MetadataStore, PluginAdapter};
pub use traits::events::CURSOR_START;
pub use traits::storage::NewDebate;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rostrum_error_has_all_variants() {
        let _validation = RostrumError::Validation("test".into());
        let _not_found = RostrumError::NotFound {
            debate_id: "d-1".into(),
        };
        let _forbidden = RostrumError::Forbidden;
        let _conflict = RostrumError::Conflict("duplicate".into());
        let _busy = RostrumError::Busy;
        let _cache = RostrumError::Cache {
            source: Box::new(std::io::Error::other("test")),
        };
        let _storage = RostrumError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _channel = RostrumError::Channel {
            message: "test".into(),
            source: None,
        };
        let _internal = RostrumError::Internal("test".into());
    }

    #[test]
    fn adapter_type_display_roundtrip() {
        use std::str::FromStr;

        for variant in [AdapterType::Storage, AdapterType::Cache, AdapterType::Engine] {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // If any trait module is missing or fails to compile, this test
        // won't compile.
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_metadata_store<T: MetadataStore>() {}
        fn _assert_cache_store<T: CacheStore>() {}
        fn _assert_event_log<T: EventLog>() {}
        fn _assert_engine<T: DebateEngine>() {}
    }
}
