//! Property-based tests for deduplication and the managed block splicer.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Fingerprints ignore surrounding whitespace and ASCII case
//! - History membership decides exact duplicates
//! - Similarity is reflexive, symmetric and bounded
//! - Splicing is idempotent and preserves text outside the block

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use aipad::services::deduplication::{ContentHasher, is_similar, levenshtein, similarity};
use aipad::services::managed_block::{MARKER_END, MARKER_START, extract, find_block, splice};
use proptest::prelude::*;

/// Free text that cannot contain a context marker.
const USER_TEXT: &str = "[a-zA-Z0-9 #*\\-\n]{0,200}";

/// Single-line ASCII content.
const CONTENT: &str = "[a-zA-Z0-9 ,.!?]{0,80}";

// ============================================================================
// Fingerprints
// ============================================================================

proptest! {
    /// Property: padding content with whitespace does not change its fingerprint.
    #[test]
    fn prop_fingerprint_ignores_padding(s in CONTENT, pad in "[ \t\n]{0,5}") {
        let padded = format!("{pad}{s}{pad}");
        prop_assert_eq!(ContentHasher::fingerprint(&padded), ContentHasher::fingerprint(&s));
    }

    /// Property: ASCII case does not change the fingerprint.
    #[test]
    fn prop_fingerprint_ignores_case(s in CONTENT) {
        prop_assert_eq!(
            ContentHasher::fingerprint(&s.to_uppercase()),
            ContentHasher::fingerprint(&s)
        );
    }

    /// Property: fingerprints are 64 lowercase hex characters.
    #[test]
    fn prop_fingerprint_is_hex(s in ".{0,100}") {
        let fp = ContentHasher::fingerprint(&s);
        prop_assert_eq!(fp.len(), 64);
        prop_assert!(fp.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    /// Property: `is_duplicate` is exactly history membership.
    #[test]
    fn prop_is_duplicate_matches_membership(
        history in prop::collection::vec(CONTENT, 0..10),
        probe in CONTENT,
    ) {
        let fingerprints: Vec<String> =
            history.iter().map(|h| ContentHasher::fingerprint(h)).collect();
        let fp = ContentHasher::fingerprint(&probe);
        prop_assert_eq!(
            ContentHasher::is_duplicate(&fp, &fingerprints),
            fingerprints.contains(&fp)
        );
    }

    /// Property: every recorded text is an exact duplicate of itself.
    #[test]
    fn prop_recorded_text_is_duplicate(history in prop::collection::vec(CONTENT, 1..10)) {
        let fingerprints: Vec<String> =
            history.iter().map(|h| ContentHasher::fingerprint(h)).collect();
        for text in &history {
            prop_assert!(ContentHasher::is_duplicate(
                &ContentHasher::fingerprint(text),
                &fingerprints
            ));
        }
    }
}

// ============================================================================
// Similarity
// ============================================================================

proptest! {
    /// Property: a text is fully similar to itself.
    #[test]
    fn prop_similarity_reflexive(s in ".{0,60}") {
        prop_assert!((similarity(&s, &s) - 1.0).abs() < f64::EPSILON);
    }

    /// Property: similarity is symmetric and within [0, 1].
    #[test]
    fn prop_similarity_symmetric_and_bounded(a in ".{0,40}", b in ".{0,40}") {
        let ab = similarity(&a, &b);
        let ba = similarity(&b, &a);
        prop_assert!((ab - ba).abs() < f64::EPSILON);
        prop_assert!((0.0..=1.0).contains(&ab));
    }

    /// Property: Levenshtein distance is bounded by the longer length.
    #[test]
    fn prop_levenshtein_bounded(a in ".{0,40}", b in ".{0,40}") {
        let d = levenshtein(&a, &b);
        let max = a.chars().count().max(b.chars().count());
        let min = a.chars().count().min(b.chars().count());
        prop_assert!(d <= max);
        prop_assert!(d >= max - min);
    }

    /// Property: the first candidate meeting the threshold is reported.
    #[test]
    fn prop_is_similar_returns_first_match(
        existing in prop::collection::vec(CONTENT, 0..8),
        probe in CONTENT,
    ) {
        let result = is_similar(&probe, &existing, 0.8);
        let expected = existing.iter().find(|e| similarity(&probe, e) >= 0.8);
        prop_assert_eq!(result.matched.as_ref(), expected);
        prop_assert_eq!(result.found, expected.is_some());
    }
}

// ============================================================================
// Managed block
// ============================================================================

proptest! {
    /// Property: applying the same block twice gives the same text.
    #[test]
    fn prop_splice_idempotent(user in USER_TEXT, block in USER_TEXT) {
        let once = splice(Some(&user), &block);
        let twice = splice(Some(&once), &block);
        prop_assert_eq!(twice, once);
    }

    /// Property: appending keeps the user's text as a prefix.
    #[test]
    fn prop_splice_preserves_prefix(user in USER_TEXT, block in USER_TEXT) {
        let out = splice(Some(&user), &block);
        prop_assert!(out.starts_with(&user));
        prop_assert_eq!(extract(&out), Some(block.as_str()));
    }

    /// Property: replacing keeps text on both sides byte-identical.
    #[test]
    fn prop_splice_replaces_in_place(
        before in USER_TEXT,
        after in USER_TEXT,
        old in USER_TEXT,
        new in USER_TEXT,
    ) {
        let wrap = |b: &str| format!("{MARKER_START}\n{b}\n{MARKER_END}");
        let existing = format!("{before}{}{after}", wrap(&old));
        let out = splice(Some(&existing), &new);
        prop_assert_eq!(out, format!("{before}{}{after}", wrap(&new)));
    }

    /// Property: a dangling start marker never swallows following text.
    #[test]
    fn prop_dangling_start_is_preserved(user in USER_TEXT, block in USER_TEXT) {
        let existing = format!("{MARKER_START}\n{user}");
        let once = splice(Some(&existing), &block);
        prop_assert!(once.starts_with(&existing));
        prop_assert_eq!(splice(Some(&once), &block), once.clone());
        prop_assert!(find_block(&once).is_some());
    }
}
