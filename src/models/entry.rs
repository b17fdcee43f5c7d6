//! Parsed scratchpad entries.

use serde::{Deserialize, Serialize};

/// One `## [timestamp] Context Update` section of the scratchpad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScratchpadEntry {
    /// Local time as written, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    /// Entry body with surrounding whitespace trimmed.
    pub content: String,
}

impl ScratchpadEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(timestamp: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            content: content.into(),
        }
    }

    /// First `max_chars` characters of the body with newlines flattened.
    ///
    /// Truncated previews end in `...`.
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> String {
        let flat = self.content.replace('\n', " ");
        if flat.chars().count() <= max_chars {
            return flat;
        }
        let mut cut: String = flat.chars().take(max_chars).collect();
        cut.push_str("...");
        cut
    }
}
