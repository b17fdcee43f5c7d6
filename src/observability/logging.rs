//! Structured logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;

/// Filter used when nothing else is configured.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Filter used with `--verbose`.
pub const VERBOSE_LOG_LEVEL: &str = "debug";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name. Unknown names yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" | "text" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Resolved logging configuration.
///
/// # Precedence
///
/// | Setting | Order |
/// |---------|-------|
/// | filter | `AIPAD_LOG`, `RUST_LOG`, `--verbose`, config file, `warn` |
/// | format | `AIPAD_LOG_FORMAT`, config file, `pretty` |
/// | file | `AIPAD_LOG_FILE`, config file, stderr |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive.
    pub filter: String,
    /// Output format.
    pub format: LogFormat,
    /// Append to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::default(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Resolves settings from the config file, CLI and process environment.
    #[must_use]
    pub fn from_settings(settings: &LoggingSettings, verbose: bool) -> Self {
        Self::from_settings_with(settings, verbose, |key| std::env::var(key).ok())
    }

    /// Resolves settings with environment lookups going through `lookup`.
    #[must_use]
    pub fn from_settings_with<F>(settings: &LoggingSettings, verbose: bool, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let filter = non_empty("AIPAD_LOG")
            .or_else(|| non_empty("RUST_LOG"))
            .or_else(|| verbose.then(|| VERBOSE_LOG_LEVEL.to_string()))
            .or_else(|| settings.level.clone())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let format = non_empty("AIPAD_LOG_FORMAT")
            .as_deref()
            .and_then(LogFormat::parse)
            .or_else(|| settings.format.as_deref().and_then(LogFormat::parse))
            .unwrap_or_default();

        let file = non_empty("AIPAD_LOG_FILE")
            .map(PathBuf::from)
            .or_else(|| settings.file.clone());

        Self {
            filter,
            format,
            file,
        }
    }
}
