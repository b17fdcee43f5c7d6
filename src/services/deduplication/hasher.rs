//! Content fingerprinting for exact-duplicate detection.
//!
//! Content is normalized before hashing so that entries differing only in
//! letter case or surrounding whitespace map to the same fingerprint.

use sha2::{Digest, Sha256};

/// Content hasher for deduplication.
///
/// # Normalization
///
/// Before hashing, content is normalized:
/// - Trimmed of leading/trailing whitespace
/// - Converted to lowercase
///
/// Interior whitespace is kept as-is; `"a  b"` and `"a b"` are different
/// entries.
///
/// # Example
///
/// ```rust
/// use aipad::services::deduplication::ContentHasher;
///
/// let hash = ContentHasher::fingerprint("Discussed the API design");
/// assert_eq!(hash.len(), 64);
///
/// let hash2 = ContentHasher::fingerprint("  DISCUSSED THE API DESIGN \n");
/// assert_eq!(hash, hash2);
/// ```
pub struct ContentHasher;

impl ContentHasher {
    /// Length of a hex-encoded SHA-256 fingerprint.
    pub const FINGERPRINT_LEN: usize = 64;

    /// Computes the SHA-256 fingerprint of normalized content.
    ///
    /// # Returns
    ///
    /// The lowercase hex-encoded digest (64 characters).
    #[must_use]
    pub fn fingerprint(content: &str) -> String {
        let normalized = Self::normalize(content);
        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Normalizes content for hashing and similarity scoring.
    ///
    /// ```rust
    /// use aipad::services::deduplication::ContentHasher;
    ///
    /// assert_eq!(ContentHasher::normalize("  Hello   WORLD \t"), "hello   world");
    /// ```
    #[must_use]
    pub fn normalize(content: &str) -> String {
        content.trim().to_lowercase()
    }

    /// Returns true if `fingerprint` is an element of `history`.
    ///
    /// Exact string equality, order-independent, linear in `history`.
    #[must_use]
    pub fn is_duplicate<S: AsRef<str>>(fingerprint: &str, history: &[S]) -> bool {
        history.iter().any(|h| h.as_ref() == fingerprint)
    }
}
