//! Marker-delimited managed block splicing.
//!
//! A managed block is the span
//!
//! ```text
//! <!-- AIPAD_CONTEXT_START -->
//! ...owned by aipad...
//! <!-- AIPAD_CONTEXT_END -->
//! ```
//!
//! inside an otherwise user-owned file. Splicing rewrites only that span and
//! preserves every byte outside it.
//!
//! # Scan rules
//!
//! | File state | Result |
//! |------------|--------|
//! | Missing | Created as `START\n{block}\nEND\n` |
//! | An `END` preceded by a `START` | That span replaced by `START\n{block}\nEND` |
//! | No `END` after any `START` | `\nSTART\n{block}\nEND\n` appended |
//!
//! Only the first pair is ever rewritten. Later pairs are treated as user
//! text.

use crate::storage::fs::{atomic_write, ensure_dir, read_optional};
use crate::{Error, Result};
use std::path::Path;
use tracing::instrument;

/// Opening sentinel of the managed block.
pub const MARKER_START: &str = "<!-- AIPAD_CONTEXT_START -->";

/// Closing sentinel of the managed block.
pub const MARKER_END: &str = "<!-- AIPAD_CONTEXT_END -->";

/// What [`apply`] did to the target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpliceOutcome {
    /// The file did not exist and was created.
    Created,
    /// An existing block was rewritten.
    Replaced,
    /// No valid block existed; one was appended.
    Appended,
    /// The file already held this exact block. Nothing was written.
    Unchanged,
}

impl SpliceOutcome {
    /// Returns the outcome as a lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Replaced => "replaced",
            Self::Appended => "appended",
            Self::Unchanged => "unchanged",
        }
    }
}

impl std::fmt::Display for SpliceOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte range of the first valid block, from the start of `MARKER_START` to
/// the end of the `MARKER_END` that closes it.
///
/// The closing marker is the first `MARKER_END` with any `MARKER_START`
/// before it; the opening marker is the nearest `MARKER_START` before that.
/// A dangling `MARKER_START` earlier in the file therefore never captures a
/// block appended after it.
#[must_use]
pub fn find_block(text: &str) -> Option<std::ops::Range<usize>> {
    text.match_indices(MARKER_END).find_map(|(end, _)| {
        text[..end]
            .rfind(MARKER_START)
            .map(|start| start..end + MARKER_END.len())
    })
}

/// Body of the first valid block, without the newline that follows
/// `MARKER_START` or the one that precedes `MARKER_END`.
#[must_use]
pub fn extract(text: &str) -> Option<&str> {
    let range = find_block(text)?;
    let inner = &text[range.start + MARKER_START.len()..range.end - MARKER_END.len()];
    let inner = inner.strip_prefix('\n').unwrap_or(inner);
    Some(inner.strip_suffix('\n').unwrap_or(inner))
}

/// Computes the new file text for `block` given the current contents.
#[must_use]
pub fn splice(existing: Option<&str>, block: &str) -> String {
    let wrapped = format!("{MARKER_START}\n{block}\n{MARKER_END}");
    match existing {
        None => format!("{wrapped}\n"),
        Some(text) => match find_block(text) {
            Some(range) => {
                let mut out = String::with_capacity(text.len() + block.len());
                out.push_str(&text[..range.start]);
                out.push_str(&wrapped);
                out.push_str(&text[range.end..]);
                out
            }
            None => format!("{text}\n{wrapped}\n"),
        },
    }
}

/// Rejects block bodies that would change where the next scan ends.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `block` contains either sentinel.
pub fn validate_block(block: &str) -> Result<()> {
    if block.contains(MARKER_START) || block.contains(MARKER_END) {
        return Err(Error::InvalidInput(
            "content must not contain aipad context markers".to_string(),
        ));
    }
    Ok(())
}

/// Inserts or replaces the managed block in the file at `path`.
///
/// The file is read in full before anything is written; the write goes
/// through a sibling temp file and a rename. Missing parent directories are
/// created. Applying the same block twice leaves the file byte-identical.
///
/// # Errors
///
/// - [`Error::InvalidInput`] if `block` contains a sentinel
/// - [`Error::IoFailure`] if reading or writing fails
#[instrument(skip(block), fields(operation = "splice", path = %path.display(), block_len = block.len()))]
pub fn apply(path: &Path, block: &str) -> Result<SpliceOutcome> {
    validate_block(block)?;
    let existing = read_optional(path)?;
    let updated = splice(existing.as_deref(), block);

    let outcome = match existing.as_deref() {
        None => SpliceOutcome::Created,
        Some(text) if text == updated => SpliceOutcome::Unchanged,
        Some(text) if find_block(text).is_some() => SpliceOutcome::Replaced,
        Some(_) => SpliceOutcome::Appended,
    };

    if outcome == SpliceOutcome::Unchanged {
        tracing::debug!("Managed block already current");
        return Ok(outcome);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    atomic_write(path, updated.as_bytes())?;
    tracing::debug!(outcome = %outcome, "Managed block written");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use test_case::test_case;

    fn wrapped(block: &str) -> String {
        format!("{MARKER_START}\n{block}\n{MARKER_END}")
    }

    #[test]
    fn test_splice_into_missing_file() {
        assert_eq!(splice(None, "ctx"), format!("{}\n", wrapped("ctx")));
    }

    #[test]
    fn test_splice_replaces_and_preserves_surroundings() {
        let existing = format!("A\n{MARKER_START}\nold\n{MARKER_END}\nB\n");
        let updated = splice(Some(&existing), "new");
        assert_eq!(updated, format!("A\n{}\nB\n", wrapped("new")));
    }

    #[test]
    fn test_splice_appends_when_no_block() {
        let updated = splice(Some("# Notes\n"), "ctx");
        assert_eq!(updated, format!("# Notes\n\n{}\n", wrapped("ctx")));
    }

    #[test_case(&format!("{MARKER_END}\nuser\n{MARKER_START}\n") ; "end before start")]
    #[test_case(&format!("user\n{MARKER_START}\ndangling\n") ; "start without end")]
    #[test_case(&format!("user\n{MARKER_END}\n") ; "end only")]
    fn test_invalid_pairs_append(existing: &str) {
        let updated = splice(Some(existing), "ctx");
        assert!(updated.starts_with(existing));
        assert_eq!(&updated[existing.len()..], format!("\n{}\n", wrapped("ctx")));
    }

    #[test]
    fn test_only_first_pair_is_rewritten() {
        let second = format!("{MARKER_START}\nkeep\n{MARKER_END}\n");
        let existing = format!("{MARKER_START}\nold\n{MARKER_END}\n{second}");
        let updated = splice(Some(&existing), "new");
        assert_eq!(updated, format!("{}\n{second}", wrapped("new")));
    }

    #[test]
    fn test_dangling_start_keeps_user_text() {
        let existing = format!("user\n{MARKER_START}\ndangling\n");
        let once = splice(Some(&existing), "ctx");
        let twice = splice(Some(&once), "ctx2");
        assert_eq!(twice, format!("{existing}\n{}\n", wrapped("ctx2")));
    }

    #[test]
    fn test_splice_is_idempotent_after_append() {
        let once = splice(Some("user text"), "ctx");
        let twice = splice(Some(&once), "ctx");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_extract() {
        let text = format!("A\n{}\nB", wrapped("line 1\nline 2"));
        assert_eq!(extract(&text), Some("line 1\nline 2"));
        assert_eq!(extract(&format!("{}\n", wrapped(""))), Some(""));
        assert_eq!(extract("no block"), None);
    }

    #[test]
    fn test_apply_lifecycle() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("CLAUDE.md");

        assert_eq!(apply(&path, "v1").unwrap(), SpliceOutcome::Created);
        assert_eq!(apply(&path, "v1").unwrap(), SpliceOutcome::Unchanged);
        assert_eq!(apply(&path, "v2").unwrap(), SpliceOutcome::Replaced);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            format!("{}\n", wrapped("v2"))
        );
    }

    #[test]
    fn test_apply_appends_to_user_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("AGENTS.md");
        std::fs::write(&path, "# AGENTS.md Configuration\n").unwrap();

        assert_eq!(apply(&path, "ctx").unwrap(), SpliceOutcome::Appended);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# AGENTS.md Configuration\n\n"));
        assert_eq!(extract(&text), Some("ctx"));
    }

    #[test]
    fn test_apply_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docs").join("CLAUDE.md");
        assert_eq!(apply(&path, "ctx").unwrap(), SpliceOutcome::Created);
    }

    #[test]
    fn test_apply_rejects_marker_in_block() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("CLAUDE.md");
        let err = apply(&path, &format!("evil {MARKER_END}")).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(!path.exists());
    }
}
