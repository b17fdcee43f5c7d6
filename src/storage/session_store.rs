//! Persistence for the session record and the scratchpad.

use super::fs::{atomic_write, read_optional};
use super::paths::PathManager;
use crate::models::SessionRecord;
use crate::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::instrument;

/// Maximum size of `state.json` accepted on load (8 MiB).
///
/// The fingerprint history grows by 65 bytes per entry, so this is far beyond
/// any realistic session.
const MAX_STATE_SIZE: u64 = 8 * 1024 * 1024;

/// Loads and saves `.aipad/state.json`.
///
/// There is no locking: two concurrent invocations may both load, mutate and
/// save, and the last save wins.
#[derive(Debug, Clone)]
pub struct SessionStore {
    paths: PathManager,
}

impl SessionStore {
    /// Creates a store over the given layout.
    #[must_use]
    pub const fn new(paths: PathManager) -> Self {
        Self { paths }
    }

    /// The underlying path layout.
    #[must_use]
    pub const fn paths(&self) -> &PathManager {
        &self.paths
    }

    /// Returns true if a session record exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.paths.state_path().is_file()
    }

    /// Loads the session record.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if `state.json` is missing
    /// - [`Error::MalformedState`] if it does not parse or is oversized
    /// - [`Error::IoFailure`] for other read errors
    #[instrument(skip(self), fields(operation = "load_session"))]
    pub fn load(&self) -> Result<SessionRecord> {
        let path = self.paths.state_path();
        let file = fs::File::open(&path)
            .map_err(|e| Error::from_read("session record", "opening", &path, e))?;

        let size = file
            .metadata()
            .map_err(|e| Error::io("inspecting", &path, e))?
            .len();
        if size > MAX_STATE_SIZE {
            return Err(Error::MalformedState {
                path,
                cause: format!("file is {size} bytes, limit is {MAX_STATE_SIZE}"),
            });
        }

        let record = SessionRecord::from_reader(std::io::BufReader::new(file))
            .map_err(|e| malformed(&path, &e))?;
        tracing::debug!(
            session_id = %record.session_id,
            entries = record.entry_count(),
            "Loaded session record"
        );
        Ok(record)
    }

    /// Saves the session record atomically, creating `.aipad/` if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IoFailure`] if the directory or file cannot be written.
    #[instrument(skip(self, record), fields(operation = "save_session", session_id = %record.session_id))]
    pub fn save(&self, record: &SessionRecord) -> Result<()> {
        self.paths.ensure_aipad_dir()?;
        let path = self.paths.state_path();
        let json = record.to_json().map_err(|e| malformed(&path, &e))?;
        atomic_write(&path, json.as_bytes())
    }

    /// Reads the full scratchpad text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the scratchpad is missing.
    pub fn read_scratchpad(&self) -> Result<String> {
        let path = self.paths.scratchpad_path();
        read_optional(&path)?.ok_or(Error::NotFound {
            what: "scratchpad",
            path,
        })
    }

    /// Creates an empty scratchpad if none exists. An existing one is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IoFailure`] if the file cannot be created.
    pub fn ensure_scratchpad(&self) -> Result<()> {
        self.paths.ensure_aipad_dir()?;
        let path = self.paths.scratchpad_path();
        if path.exists() {
            return Ok(());
        }
        atomic_write(&path, b"")
    }
}

fn malformed(path: &Path, err: &serde_json::Error) -> Error {
    Error::MalformedState {
        path: path.to_path_buf(),
        cause: err.to_string(),
    }
}
