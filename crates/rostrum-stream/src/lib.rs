// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event-log tailing for the Rostrum debate service: cursor-resumable
//! streams with keep-alive synthesis and three-tier payload
//! normalization.

pub mod normalize;
pub mod tail;

pub use normalize::{normalize_output, normalize_payload};
pub use tail::{StreamItem, tail};
