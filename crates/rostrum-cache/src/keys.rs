// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key namespace shared by every store backend.
//!
//! Everything lives under the `debate:` prefix: `cache:`, `lock:` and
//! `inflight:` sub-namespaces are keyed by fingerprint, and each per-job
//! event log sits at `debate:{job_id}`.

/// Fingerprint -> debate_id reuse entry.
pub fn cache_key(fingerprint: &str) -> String {
    format!("debate:cache:{fingerprint}")
}

/// Mutual-exclusion lock guarding job creation for a fingerprint.
pub fn lock_key(fingerprint: &str) -> String {
    format!("debate:lock:{fingerprint}")
}

/// Fast-path pointer from a fingerprint to the job currently being created.
pub fn inflight_key(fingerprint: &str) -> String {
    format!("debate:inflight:{fingerprint}")
}

/// Per-job append-only event log.
pub fn stream_key(job_id: &str) -> String {
    format!("debate:{job_id}")
}
