//! The scratchpad: a Markdown log of timestamped context entries.
//!
//! Each entry is appended as
//!
//! ```text
//!
//! ## [2025-01-01 10:00:00] Context Update
//! {text}
//! ---
//! ```
//!
//! with the timestamp in local time.

use crate::models::ScratchpadEntry;
use crate::{Error, Result};
use chrono::{DateTime, Local, TimeZone};
use regex::Regex;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;

/// Timestamp format used in entry headings.
pub const ENTRY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Matches one entry: heading timestamp, then the body up to a line that is
/// exactly `---`, or end of text.
static ENTRY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"## \[([^\]]+)\] Context Update\n([\s\S]*?)(?:\n---(?:\n|$)|$)")
        .unwrap_or_else(|_| unreachable!())
});

/// Renders an entry exactly as it is appended to the scratchpad.
#[must_use]
pub fn format_entry<Tz>(timestamp: &DateTime<Tz>, text: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "\n## [{}] Context Update\n{text}\n---\n",
        timestamp.format(ENTRY_TIMESTAMP_FORMAT)
    )
}

/// Appends an entry stamped with the current local time.
///
/// The scratchpad is created if it does not exist.
///
/// # Errors
///
/// Returns [`Error::IoFailure`] if the file cannot be opened or written.
pub fn append_entry(path: &Path, text: &str) -> Result<()> {
    let entry = format_entry(&Local::now(), text);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::io("opening", path, e))?;
    file.write_all(entry.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(|e| Error::io("appending to", path, e))
}

/// Splits scratchpad text into entries, in file order.
///
/// Free text between entries is ignored. Bodies are trimmed.
#[must_use]
pub fn parse_entries(text: &str) -> Vec<ScratchpadEntry> {
    ENTRY_PATTERN
        .captures_iter(text)
        .map(|caps| ScratchpadEntry::new(&caps[1], caps[2].trim()))
        .collect()
}

/// Entry bodies, for the similarity tier of the deduplication check.
#[must_use]
pub fn entry_texts(text: &str) -> Vec<String> {
    parse_entries(text)
        .into_iter()
        .map(|entry| entry.content)
        .collect()
}
