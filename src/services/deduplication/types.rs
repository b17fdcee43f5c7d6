//! Deduplication result types.

use serde::{Deserialize, Serialize};

/// Result of a deduplication check.
///
/// # Example
///
/// ```rust
/// use aipad::services::deduplication::{DuplicateCheckResult, DuplicateReason};
///
/// let result = DuplicateCheckResult::exact_match("ab12".to_string());
/// assert!(result.is_duplicate);
/// assert_eq!(result.reason, Some(DuplicateReason::ExactMatch));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateCheckResult {
    /// Whether the content is a duplicate.
    pub is_duplicate: bool,

    /// Why the content was classified as a duplicate.
    pub reason: Option<DuplicateReason>,

    /// Fingerprint of the checked content.
    pub fingerprint: String,

    /// Similarity ratio for fuzzy matches.
    pub similarity_score: Option<f64>,

    /// The existing entry a fuzzy match was made against.
    pub matched_text: Option<String>,
}

impl DuplicateCheckResult {
    /// Creates a result indicating the content is new.
    #[must_use]
    pub const fn unique(fingerprint: String) -> Self {
        Self {
            is_duplicate: false,
            reason: None,
            fingerprint,
            similarity_score: None,
            matched_text: None,
        }
    }

    /// Creates a result for a fingerprint already present in history.
    #[must_use]
    pub const fn exact_match(fingerprint: String) -> Self {
        Self {
            is_duplicate: true,
            reason: Some(DuplicateReason::ExactMatch),
            fingerprint,
            similarity_score: None,
            matched_text: None,
        }
    }

    /// Creates a result for content similar to an existing entry.
    #[must_use]
    pub const fn similar(fingerprint: String, matched_text: String, score: f64) -> Self {
        Self {
            is_duplicate: true,
            reason: Some(DuplicateReason::SimilarContent),
            fingerprint,
            similarity_score: Some(score),
            matched_text: Some(matched_text),
        }
    }
}

/// The reason content was identified as a duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateReason {
    /// Normalized SHA-256 fingerprint is already in history.
    ExactMatch,

    /// Similarity ratio against an existing entry meets the threshold.
    SimilarContent,
}

impl DuplicateReason {
    /// Returns the reason as a `snake_case` label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExactMatch => "exact_match",
            Self::SimilarContent => "similar_content",
        }
    }
}

impl std::fmt::Display for DuplicateReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
