//! # aipad
//!
//! Shared context scratchpad for AI coding assistants.
//!
//! aipad keeps a running log of conversation context in `.aipad/scratchpad.md`
//! and propagates it into each assistant's configuration file (`CLAUDE.md`,
//! `AGENTS.md`, ...) inside a marker-delimited managed block. Everything
//! outside the block belongs to the user and is preserved byte-for-byte.
//!
//! ## Features
//!
//! - Exact deduplication via normalized SHA-256 fingerprints
//! - Fuzzy deduplication via Levenshtein similarity ratio
//! - Idempotent managed-block splicing into arbitrary text files
//! - Built-in and user-defined sync targets
//!
//! ## Example
//!
//! ```rust
//! use aipad::services::deduplication::{ContentHasher, similarity};
//!
//! let a = ContentHasher::fingerprint("  Use PostgreSQL ");
//! let b = ContentHasher::fingerprint("use postgresql");
//! assert_eq!(a, b);
//! assert!(similarity("kitten", "sitting") < 0.6);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;
use thiserror::Error as ThisError;

pub mod config;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

pub use config::AipadConfig;
pub use models::{
    CaptureOutcome, CaptureRequest, ScratchpadEntry, SessionRecord, TargetConfig, TargetRegistry,
};
pub use services::{CaptureService, ExportFormat, SyncReport, SyncSelection, SyncService};
pub use storage::{PathManager, ProviderStore, SessionStore};

/// Error type for aipad operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `NotFound` | Session record or scratchpad is missing |
/// | `IoFailure` | Permission or disk errors on read/write |
/// | `MalformedState` | A JSON state or registry file fails to parse |
/// | `UnknownTarget` | A target id is not in the merged registry |
/// | `InvalidInput` | Empty content, duplicate or built-in custom target ids |
/// | `OperationFailed` | Config parsing or logging setup fails |
#[derive(Debug, ThisError)]
pub enum Error {
    /// A required file does not exist.
    ///
    /// Raised when `state.json` or `scratchpad.md` is missing. The caller
    /// should ask the user to run `aipad new <provider>` first.
    #[error("{what} not found at {}", path.display())]
    NotFound {
        /// What was being looked up.
        what: &'static str,
        /// Where it was expected.
        path: PathBuf,
    },

    /// A filesystem operation failed.
    #[error("I/O error while {operation} {}: {source}", path.display())]
    IoFailure {
        /// The operation that failed.
        operation: &'static str,
        /// The path involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Persisted state could not be parsed.
    ///
    /// Never auto-repaired: the file is left as-is for the user to inspect.
    #[error("malformed state in {}: {cause}", path.display())]
    MalformedState {
        /// The offending file.
        path: PathBuf,
        /// Parser message.
        cause: String,
    },

    /// The requested target is neither built-in nor a known custom target.
    #[error("unknown target '{0}'")]
    UnknownTarget(String),

    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A setup step outside the core engines failed.
    ///
    /// Raised for configuration files that do not parse and for logging
    /// initialization.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Builds an [`Error::IoFailure`].
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoFailure {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Maps an I/O error to [`Error::NotFound`] when the file is missing,
    /// otherwise to [`Error::IoFailure`].
    pub fn from_read(
        what: &'static str,
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { what, path }
        } else {
            Self::io(operation, path, source)
        }
    }

    /// Returns true for [`Error::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type alias for aipad operations.
pub type Result<T> = std::result::Result<T, Error>;
