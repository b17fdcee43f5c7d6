//! The durable session record persisted at `.aipad/state.json`.

use super::target::{TargetConfig, builtin_targets};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use uuid::Uuid;

/// Current record format tag.
pub const SESSION_FORMAT_VERSION: &str = "1.0";

/// Durable state for one working directory.
///
/// Invariants:
/// - `context_hashes` only grows for the lifetime of a record
/// - `last_sync` never moves backwards
/// - `providers` always holds the built-in targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Format tag.
    pub version: String,
    /// Active target id, the default sync destination.
    pub current_provider: String,
    /// Generated once at creation.
    pub session_id: Uuid,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time of the last content change or successful sync.
    pub last_sync: DateTime<Utc>,
    /// Fingerprints of recorded entries, oldest first.
    #[serde(default)]
    pub context_hashes: Vec<String>,
    /// Reserved; kept so older records round-trip.
    #[serde(default)]
    pub context_history: Vec<String>,
    /// Built-in target map.
    #[serde(default)]
    pub providers: BTreeMap<String, TargetConfig>,
}

impl SessionRecord {
    /// Creates a fresh record with a new session id and the built-in targets.
    #[must_use]
    pub fn create_default(target_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            version: SESSION_FORMAT_VERSION.to_string(),
            current_provider: target_id.into(),
            session_id: Uuid::new_v4(),
            created_at: now,
            last_sync: now,
            context_hashes: Vec::new(),
            context_history: Vec::new(),
            providers: builtin_targets(),
        }
    }

    /// Appends a fingerprint to the history. No deduplication happens here.
    pub fn record_entry(&mut self, fingerprint: impl Into<String>) {
        self.context_hashes.push(fingerprint.into());
    }

    /// Moves `last_sync` to now, or leaves it if the clock went backwards.
    pub fn touch_sync(&mut self) {
        self.last_sync = self.last_sync.max(Utc::now());
    }

    /// Changes the default sync destination.
    pub fn set_current_provider(&mut self, target_id: impl Into<String>) {
        self.current_provider = target_id.into();
    }

    /// Number of recorded fingerprints.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.context_hashes.len()
    }

    /// Re-inserts any built-in target missing from `providers`.
    ///
    /// Existing entries are left as they are. Returns true if anything was
    /// added.
    pub fn ensure_builtin_targets(&mut self) -> bool {
        let mut added = false;
        for (id, config) in builtin_targets() {
            if !self.providers.contains_key(&id) {
                self.providers.insert(id, config);
                added = true;
            }
        }
        added
    }

    /// Decodes a record from a byte stream and restores built-in targets.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the stream is not a valid record.
    pub fn from_reader<R: Read>(reader: R) -> serde_json::Result<Self> {
        let mut record: Self = serde_json::from_reader(reader)?;
        record.ensure_builtin_targets();
        Ok(record)
    }

    /// Encodes the record as pretty JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization or the write fails.
    pub fn to_writer<W: Write>(&self, mut writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n").map_err(serde_json::Error::io)
    }

    /// Decodes a record from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the text is not a valid record.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        Self::from_reader(text.as_bytes())
    }

    /// Encodes the record as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut out = Vec::new();
        self.to_writer(&mut out)?;
        String::from_utf8(out).map_err(|e| {
            serde_json::Error::io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }
}
