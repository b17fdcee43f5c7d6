//! Session export in Markdown, plain text or JSON.

use crate::models::{ScratchpadEntry, SessionRecord};
use crate::services::scratchpad::parse_entries;
use crate::storage::SessionStore;
use crate::storage::fs::{atomic_write, ensure_dir};
use crate::{Error, Result};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::instrument;

const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Markdown with a metadata header.
    Markdown,
    /// Plain text with a metadata header.
    Text,
    /// JSON document with metadata and parsed entries.
    Json,
}

impl ExportFormat {
    /// Picks the format from a file extension. Unknown extensions are
    /// exported as Markdown.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Self::Json,
            Some("txt") => Self::Text,
            _ => Self::Markdown,
        }
    }

    /// Lowercase name of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

/// Default export file name, `export-YYYYMMDD-HHMMSS.md` in local time.
#[must_use]
pub fn default_export_name(now: &DateTime<Local>) -> String {
    format!("export-{}.md", now.format("%Y%m%d-%H%M%S"))
}

#[derive(Serialize)]
struct JsonExport<'a> {
    session_id: String,
    provider: &'a str,
    created_at: String,
    exported_at: String,
    entries: usize,
    history: Vec<ScratchpadEntry>,
}

/// Renders an export document.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if JSON serialization fails.
pub fn render(
    format: ExportFormat,
    record: &SessionRecord,
    scratchpad: &str,
    exported_at: DateTime<Utc>,
) -> Result<String> {
    let created = record.created_at.with_timezone(&Local).format(DISPLAY_TIME_FORMAT);
    let exported = exported_at.with_timezone(&Local).format(DISPLAY_TIME_FORMAT);
    let count = record.entry_count();

    let rendered = match format {
        ExportFormat::Markdown => format!(
            "# AIPad Conversation Export\n\n\
             **Session ID:** {}\n\n\
             **Provider:** {}\n\n\
             **Created:** {created}\n\n\
             **Exported:** {exported}\n\n\
             **Total Entries:** {count}\n\n\
             ---\n\n\
             {scratchpad}",
            record.session_id, record.current_provider,
        ),
        ExportFormat::Text => format!(
            "AIPad Conversation Export\n\
             ==========================\n\
             Session ID: {}\n\
             Provider: {}\n\
             Created: {created}\n\
             Exported: {exported}\n\
             Total Entries: {count}\n\
             \n\
             {scratchpad}",
            record.session_id, record.current_provider,
        ),
        ExportFormat::Json => {
            let doc = JsonExport {
                session_id: record.session_id.to_string(),
                provider: &record.current_provider,
                created_at: record.created_at.to_rfc3339(),
                exported_at: exported_at.to_rfc3339(),
                entries: count,
                history: parse_entries(scratchpad),
            };
            serde_json::to_string_pretty(&doc)
                .map_err(|e| Error::InvalidInput(format!("cannot encode export: {e}")))?
        }
    };
    Ok(rendered)
}

/// Summary of a written export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Where the export was written.
    pub path: PathBuf,
    /// Format used.
    pub format: ExportFormat,
    /// Session that was exported.
    pub session_id: String,
    /// Recorded entry count.
    pub entries: usize,
}

/// Writes an export of the session at `store` to `path`.
///
/// Relative paths are resolved against the working root.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if there is no session or scratchpad, or
/// [`Error::IoFailure`] if the file cannot be written.
#[instrument(skip(store), fields(operation = "export", path = %path.display()))]
pub fn export_to(store: &SessionStore, path: &Path) -> Result<ExportSummary> {
    let record = store.load()?;
    let scratchpad = store.read_scratchpad()?;
    let format = ExportFormat::from_path(path);
    let rendered = render(format, &record, &scratchpad, Utc::now())?;

    let target = store.paths().resolve(path);
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    atomic_write(&target, rendered.as_bytes())?;
    tracing::info!(format = format.as_str(), entries = record.entry_count(), "Export written");

    Ok(ExportSummary {
        path: target,
        format,
        session_id: record.session_id.to_string(),
        entries: record.entry_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::scratchpad::format_entry;
    use crate::storage::PathManager;
    use tempfile::TempDir;
    use test_case::test_case;

    #[test_case("out.json", ExportFormat::Json)]
    #[test_case("out.TXT", ExportFormat::Text)]
    #[test_case("out.md", ExportFormat::Markdown)]
    #[test_case("out.html", ExportFormat::Markdown)]
    #[test_case("noext", ExportFormat::Markdown)]
    fn test_format_from_path(path: &str, expected: ExportFormat) {
        assert_eq!(ExportFormat::from_path(Path::new(path)), expected);
    }

    fn sample() -> (SessionRecord, String) {
        let mut record = SessionRecord::create_default("claude");
        record.record_entry("h1");
        let scratchpad = format_entry(&Utc::now(), "Fixed the login bug");
        (record, scratchpad)
    }

    #[test]
    fn test_render_markdown() {
        let (record, scratchpad) = sample();
        let out = render(ExportFormat::Markdown, &record, &scratchpad, Utc::now()).unwrap();
        assert!(out.starts_with("# AIPad Conversation Export\n\n"));
        assert!(out.contains(&format!("**Session ID:** {}\n", record.session_id)));
        assert!(out.contains("**Total Entries:** 1\n\n---\n\n"));
        assert!(out.ends_with(&scratchpad));
    }

    #[test]
    fn test_render_text() {
        let (record, scratchpad) = sample();
        let out = render(ExportFormat::Text, &record, &scratchpad, Utc::now()).unwrap();
        assert!(out.starts_with("AIPad Conversation Export\n=========================="));
        assert!(out.contains("Provider: claude\n"));
        assert!(out.ends_with(&format!("\n\n{scratchpad}")));
    }

    #[test]
    fn test_render_json() {
        let (record, scratchpad) = sample();
        let out = render(ExportFormat::Json, &record, &scratchpad, Utc::now()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["session_id"], record.session_id.to_string());
        assert_eq!(value["provider"], "claude");
        assert_eq!(value["entries"], 1);
        assert_eq!(value["history"][0]["content"], "Fixed the login bug");
    }

    #[test]
    fn test_render_json_escapes_quotes() {
        let mut record = SessionRecord::create_default("my \"ai\"");
        record.record_entry("h1");
        let out = render(ExportFormat::Json, &record, "", Utc::now()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["provider"], "my \"ai\"");
    }

    #[test]
    fn test_default_export_name() {
        let name = default_export_name(&Local::now());
        assert!(name.starts_with("export-"));
        assert!(name.ends_with(".md"));
        assert_eq!(name.len(), "export-YYYYMMDD-HHMMSS.md".len());
    }

    #[test]
    fn test_export_to_writes_file() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(PathManager::new(dir.path()));
        store.save(&SessionRecord::create_default("claude")).unwrap();
        store.ensure_scratchpad().unwrap();

        let summary = export_to(&store, Path::new("exports/session.json")).unwrap();
        assert_eq!(summary.format, ExportFormat::Json);
        assert_eq!(summary.path, dir.path().join("exports/session.json"));
        assert!(summary.path.is_file());
    }
}
