//! Deduplication service orchestrator.
//!
//! Runs the two-tier check:
//! 1. **Exact match**: normalized SHA-256 fingerprint against the session's
//!    fingerprint history
//! 2. **Similar content**: Levenshtein ratio against the texts of existing
//!    scratchpad entries
//!
//! Short-circuits on the first tier that reports a duplicate.

use super::config::DeduplicationConfig;
use super::hasher::ContentHasher;
use super::similarity::is_similar;
use super::types::{DuplicateCheckResult, DuplicateReason};
use tracing::instrument;

/// Service for deduplication checking.
///
/// The service is stateless apart from its configuration; callers pass the
/// history to check against and decide what to do with the result.
///
/// # Example
///
/// ```rust
/// use aipad::services::deduplication::{ContentHasher, DeduplicationService};
///
/// let service = DeduplicationService::default();
/// let history = vec![ContentHasher::fingerprint("Use PostgreSQL")];
///
/// let result = service.check("  use postgresql ", &history, &[] as &[&str]);
/// assert!(result.is_duplicate);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DeduplicationService {
    config: DeduplicationConfig,
}

impl DeduplicationService {
    /// Creates a service with the given configuration.
    #[must_use]
    pub const fn new(config: DeduplicationConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &DeduplicationConfig {
        &self.config
    }

    /// Classifies `content` as unique, an exact duplicate or a near-duplicate.
    ///
    /// `history` holds previously recorded fingerprints; `existing_texts`
    /// holds the bodies of existing entries for the similarity tier.
    #[instrument(
        skip(self, content, history, existing_texts),
        fields(
            operation = "dedup_check",
            content_length = content.len(),
            history_len = history.len()
        )
    )]
    pub fn check<H, T>(
        &self,
        content: &str,
        history: &[H],
        existing_texts: &[T],
    ) -> DuplicateCheckResult
    where
        H: AsRef<str>,
        T: AsRef<str>,
    {
        let fingerprint = ContentHasher::fingerprint(content);

        if ContentHasher::is_duplicate(&fingerprint, history) {
            tracing::info!(fingerprint = %fingerprint, "Exact duplicate found");
            record_duplicate(DuplicateReason::ExactMatch);
            return DuplicateCheckResult::exact_match(fingerprint);
        }

        if self.config.fuzzy_enabled && !existing_texts.is_empty() {
            let found = is_similar(content, existing_texts, self.config.similarity_threshold);
            if let (true, Some(matched)) = (found.found, found.matched) {
                tracing::info!(
                    ratio = found.ratio,
                    threshold = self.config.similarity_threshold,
                    "Similar entry found"
                );
                record_duplicate(DuplicateReason::SimilarContent);
                return DuplicateCheckResult::similar(fingerprint, matched, found.ratio);
            }
        }

        metrics::counter!("dedup_checks_total", "result" => "unique").increment(1);
        tracing::debug!(fingerprint = %fingerprint, "Content is unique");
        DuplicateCheckResult::unique(fingerprint)
    }
}

fn record_duplicate(reason: DuplicateReason) {
    metrics::counter!("dedup_checks_total", "result" => "duplicate").increment(1);
    metrics::counter!("dedup_duplicates_total", "reason" => reason.as_str()).increment(1);
}
