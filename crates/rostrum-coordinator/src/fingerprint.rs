// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical request fingerprinting.
//!
//! Two requests share a fingerprint exactly when their normalized
//! (topic, debater_1, debater_2) triples match inside the same ownership
//! scope. Debater order is significant: swapping the two sides changes
//! the generated content, so it changes the fingerprint.

use sha2::{Digest, Sha256};

// Unit separator; cannot appear in normalized fields.
const FIELD_SEP: char = '\u{1f}';

/// Canonicalize one request field: trim, collapse internal whitespace
/// runs to a single space, lowercase. Idempotent.
pub fn normalize(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Build the scoped fingerprint for a request.
///
/// The scope is `user:{user_id}` when a user id is present, else
/// `session:{session_id}`. Anonymous sessions therefore never collide
/// with each other, while an authenticated user gets cross-session
/// dedup.
pub fn build_fingerprint(
    topic: &str,
    debater_1: &str,
    debater_2: &str,
    session_id: &str,
    user_id: Option<&str>,
) -> String {
    let scope = match user_id {
        Some(user) => format!("user:{user}"),
        None => format!("session:{session_id}"),
    };
    let canonical = format!(
        "{scope}{FIELD_SEP}{}{FIELD_SEP}{}{FIELD_SEP}{}",
        normalize(topic),
        normalize(debater_1),
        normalize(debater_2),
    );
    hex::encode(Sha256::digest(canonical.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_collapses_and_lowercases() {
        assert_eq!(normalize("  Space   Elevators \t Now "), "space elevators now");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize("  AI   Safety  ");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn whitespace_and_case_variants_share_a_fingerprint() {
        let a = build_fingerprint("AI  Safety", "Ada", "Grace", "s1", None);
        let b = build_fingerprint(" ai safety ", "ada", "GRACE", "s1", None);
        assert_eq!(a, b);
    }

    #[test]
    fn debater_order_is_significant() {
        let ab = build_fingerprint("topic", "Ada", "Grace", "s1", None);
        let ba = build_fingerprint("topic", "Grace", "Ada", "s1", None);
        assert_ne!(ab, ba);
    }

    #[test]
    fn user_scope_overrides_session_scope() {
        let sessions_differ = build_fingerprint("t", "a", "b", "s1", Some("u1"));
        let same_user = build_fingerprint("t", "a", "b", "s2", Some("u1"));
        assert_eq!(sessions_differ, same_user);

        let other_user = build_fingerprint("t", "a", "b", "s1", Some("u2"));
        assert_ne!(sessions_differ, other_user);
    }

    #[test]
    fn anonymous_sessions_never_collide() {
        let s1 = build_fingerprint("t", "a", "b", "s1", None);
        let s2 = build_fingerprint("t", "a", "b", "s2", None);
        assert_ne!(s1, s2);
    }

    #[test]
    fn fingerprint_is_fixed_length_hex() {
        let fp = build_fingerprint("t", "a", "b", "s1", None);
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
