// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request fingerprinting, generation locking, and debate orchestration.
//!
//! [`fingerprint`] canonicalizes requests into dedup keys,
//! [`resolver::LockCoordinator`] guards creation against thundering
//! herds, and [`service::DebateService`] drives the full create and
//! authorize flows on top of the adapter traits.

pub mod fingerprint;
pub mod resolver;
pub mod service;

pub use fingerprint::{build_fingerprint, normalize};
pub use resolver::{LockCoordinator, Resolution};
pub use service::{CreateDebateRequest, CreateOutcome, DebateService};
