//! Capture request and outcome types.

use crate::services::deduplication::DuplicateCheckResult;

/// Request to add a piece of context to the scratchpad.
#[derive(Debug, Clone, Default)]
pub struct CaptureRequest {
    /// The text to capture.
    pub content: String,
    /// Skip the fuzzy tier. Exact duplicates are still rejected.
    pub force: bool,
}

impl CaptureRequest {
    /// Creates a new capture request with the given content.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Sets whether near-duplicates are accepted.
    #[must_use]
    pub const fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Result of a capture operation.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    /// The entry was appended and its fingerprint recorded.
    Added {
        /// Fingerprint of the new entry.
        fingerprint: String,
        /// History length after the append.
        entry_count: usize,
    },
    /// Nothing was written.
    Duplicate(DuplicateCheckResult),
}

impl CaptureOutcome {
    /// Returns true if the entry was appended.
    #[must_use]
    pub const fn is_added(&self) -> bool {
        matches!(self, Self::Added { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = CaptureRequest::new("Fixed the login bug").with_force(true);
        assert_eq!(request.content, "Fixed the login bug");
        assert!(request.force);
        assert!(!CaptureRequest::new("x").force);
    }

    #[test]
    fn test_outcome_is_added() {
        let added = CaptureOutcome::Added {
            fingerprint: "abc".to_string(),
            entry_count: 1,
        };
        assert!(added.is_added());
        let dup = CaptureOutcome::Duplicate(DuplicateCheckResult::exact_match("abc".to_string()));
        assert!(!dup.is_added());
    }
}
