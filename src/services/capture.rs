//! Context capture service.
//!
//! Handles adding new context to the scratchpad: validation, deduplication,
//! the append itself and the session record update.

use crate::models::{CaptureOutcome, CaptureRequest};
use crate::services::deduplication::DeduplicationService;
use crate::services::managed_block::validate_block;
use crate::services::scratchpad::{append_entry, entry_texts};
use crate::storage::SessionStore;
use crate::{Error, Result};
use tracing::instrument;

/// Service for capturing context entries.
#[derive(Debug, Clone)]
pub struct CaptureService {
    /// Session record and scratchpad access.
    store: SessionStore,
    /// Duplicate classifier.
    dedup: DeduplicationService,
}

impl CaptureService {
    /// Creates a new capture service.
    #[must_use]
    pub const fn new(store: SessionStore, dedup: DeduplicationService) -> Self {
        Self { store, dedup }
    }

    /// Captures a context entry.
    ///
    /// Exact duplicates are always skipped. Near-duplicates are skipped unless
    /// the request sets `force`. A skipped entry leaves every file untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The content is empty or contains a context marker
    /// - No session exists ([`Error::NotFound`])
    /// - The scratchpad or session record cannot be written
    #[instrument(
        skip(self, request),
        fields(operation = "capture", content_length = request.content.len(), force = request.force)
    )]
    pub fn capture(&self, request: CaptureRequest) -> Result<CaptureOutcome> {
        let content = request.content.trim();
        if content.is_empty() {
            return Err(Error::InvalidInput("content cannot be empty".to_string()));
        }
        validate_block(content)?;

        let mut record = self.store.load()?;
        let scratchpad = self.store.read_scratchpad()?;

        let existing = if request.force {
            Vec::new()
        } else {
            entry_texts(&scratchpad)
        };
        let check = self.dedup.check(content, &record.context_hashes, &existing);
        if check.is_duplicate {
            tracing::info!(reason = ?check.reason, "Skipping duplicate context");
            return Ok(CaptureOutcome::Duplicate(check));
        }

        append_entry(&self.store.paths().scratchpad_path(), content)?;
        record.record_entry(check.fingerprint.clone());
        record.touch_sync();
        self.store.save(&record)?;

        metrics::counter!("capture_operations_total").increment(1);
        tracing::info!(
            fingerprint = %check.fingerprint,
            entries = record.entry_count(),
            "Context captured"
        );
        Ok(CaptureOutcome::Added {
            fingerprint: check.fingerprint,
            entry_count: record.entry_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionRecord;
    use crate::services::deduplication::{ContentHasher, DuplicateReason};
    use crate::storage::PathManager;
    use tempfile::TempDir;

    fn setup() -> (TempDir, CaptureService, SessionStore) {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(PathManager::new(dir.path()));
        store.save(&SessionRecord::create_default("claude")).unwrap();
        store.ensure_scratchpad().unwrap();
        let service = CaptureService::new(store.clone(), DeduplicationService::default());
        (dir, service, store)
    }

    #[test]
    fn test_capture_appends_and_records() {
        let (_dir, service, store) = setup();
        let outcome = service.capture(CaptureRequest::new("Fixed the login bug")).unwrap();

        assert_eq!(
            outcome,
            CaptureOutcome::Added {
                fingerprint: ContentHasher::fingerprint("Fixed the login bug"),
                entry_count: 1,
            }
        );
        assert_eq!(entry_texts(&store.read_scratchpad().unwrap()), vec!["Fixed the login bug"]);
        assert_eq!(store.load().unwrap().entry_count(), 1);
    }

    #[test]
    fn test_exact_duplicate_leaves_files_untouched() {
        let (_dir, service, store) = setup();
        let mut record = store.load().unwrap();
        record.record_entry("h1");
        record.record_entry("h2");
        record.record_entry(ContentHasher::fingerprint("Fixed the login bug"));
        store.save(&record).unwrap();
        let before = store.read_scratchpad().unwrap();

        let outcome = service
            .capture(CaptureRequest::new("  fixed the LOGIN bug").with_force(true))
            .unwrap();

        let CaptureOutcome::Duplicate(check) = outcome else {
            panic!("expected duplicate");
        };
        assert_eq!(check.reason, Some(DuplicateReason::ExactMatch));
        assert_eq!(store.read_scratchpad().unwrap(), before);
        assert_eq!(store.load().unwrap().entry_count(), 3);
    }

    #[test]
    fn test_near_duplicate_and_force() {
        let (_dir, service, store) = setup();
        service
            .capture(CaptureRequest::new(
                "Discussed the new API design with focus on REST principles",
            ))
            .unwrap();

        let near = "Discussed the new API design with focus on REST principle";
        let outcome = service.capture(CaptureRequest::new(near)).unwrap();
        assert!(!outcome.is_added());

        let outcome = service.capture(CaptureRequest::new(near).with_force(true)).unwrap();
        assert!(outcome.is_added());
        assert_eq!(store.load().unwrap().entry_count(), 2);
    }

    #[test]
    fn test_inline_dashes_do_not_shorten_existing_entries() {
        let (_dir, service, store) = setup();
        service
            .capture(CaptureRequest::new(
                "Split the auth module---see PR 12 for the migration plan",
            ))
            .unwrap();

        let outcome = service.capture(CaptureRequest::new("split the auth module")).unwrap();
        assert!(outcome.is_added());
        assert_eq!(store.load().unwrap().entry_count(), 2);
    }

    #[test]
    fn test_capture_validation() {
        let (_dir, service, _store) = setup();
        assert!(matches!(
            service.capture(CaptureRequest::new("   ")),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            service.capture(CaptureRequest::new("<!-- AIPAD_CONTEXT_END -->")),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_capture_without_session() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(PathManager::new(dir.path()));
        let service = CaptureService::new(store, DeduplicationService::default());
        let err = service.capture(CaptureRequest::new("text")).unwrap_err();
        assert!(err.is_not_found());
    }
}
