//! Configuration management.
//!
//! Settings come from a TOML file and are then overridden by `AIPAD_*`
//! environment variables:
//!
//! ```toml
//! [dedup]
//! similarity_threshold = 0.85
//! fuzzy_enabled = true
//!
//! [sync]
//! copy_to_rules = true
//!
//! [logging]
//! level = "info"
//! format = "json"
//! file = "/tmp/aipad.log"
//! ```
//!
//! The file is looked up at `--config`, then `AIPAD_CONFIG_PATH`, then
//! `{config_dir}/aipad/config.toml`.

use crate::services::deduplication::{DeduplicationConfig, parse_bool};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "AIPAD_CONFIG_PATH";

/// Main configuration for aipad.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AipadConfig {
    /// Deduplication settings.
    pub dedup: DeduplicationConfig,
    /// Sync settings.
    pub sync: SyncSettings,
    /// Logging settings as written in the file; resolved by the
    /// observability module.
    pub logging: LoggingSettings,
}

/// Sync settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Copy the scratchpad into each target's rules directory.
    pub copy_to_rules: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            copy_to_rules: true,
        }
    }
}

/// Logging section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `aipad=debug`.
    pub level: Option<String>,
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Deduplication section.
    pub dedup: Option<ConfigFileDedup>,
    /// Sync section.
    pub sync: Option<ConfigFileSync>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

/// Dedup section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileDedup {
    /// Similarity threshold.
    pub similarity_threshold: Option<f64>,
    /// Fuzzy tier toggle.
    pub fuzzy_enabled: Option<bool>,
}

/// Sync section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileSync {
    /// Rules directory copy toggle.
    pub copy_to_rules: Option<bool>,
}

/// A loaded configuration plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The effective configuration, env overrides applied.
    pub config: AipadConfig,
    /// The file that was read, if any.
    pub source: Option<PathBuf>,
    /// Why the default file was ignored, if it was.
    pub fallback_reason: Option<String>,
}

impl AipadConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the text is not a valid config.
    pub fn from_toml(text: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;
        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::from_read("config file", "reading", path, e))?;
        Self::from_toml(&contents)
    }

    /// Default config file location, `{config_dir}/aipad/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("aipad").join("config.toml"))
    }

    /// Loads configuration for the process and applies env overrides.
    ///
    /// An explicit path (argument, then `AIPAD_CONFIG_PATH`) must exist and
    /// parse. The default path is optional; if it fails to parse, defaults
    /// are used and the reason is returned for logging.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit config file is missing or invalid.
    pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig> {
        Self::load_with(explicit, |key| std::env::var(key).ok(), Self::default_path())
    }

    fn load_with<F>(
        explicit: Option<&Path>,
        lookup: F,
        default_path: Option<PathBuf>,
    ) -> Result<LoadedConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| lookup(CONFIG_PATH_ENV).map(PathBuf::from));

        let (config, source, fallback_reason) = if let Some(path) = explicit {
            (Self::load_from_file(&path)?, Some(path), None)
        } else {
            match default_path.filter(|p| p.is_file()) {
                Some(path) => match Self::load_from_file(&path) {
                    Ok(config) => (config, Some(path), None),
                    Err(e) => (Self::default(), None, Some(e.to_string())),
                },
                None => (Self::default(), None, None),
            }
        };

        Ok(LoadedConfig {
            config: config.with_overrides_from(lookup),
            source,
            fallback_reason,
        })
    }

    /// Applies `AIPAD_*` overrides read through `lookup`.
    ///
    /// Logging variables are resolved later by the observability module.
    #[must_use]
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(copy) = lookup("AIPAD_SYNC_COPY_RULES").and_then(|v| parse_bool(&v)) {
            self.sync.copy_to_rules = copy;
        }
        self.dedup = self.dedup.with_overrides_from(lookup);
        self
    }

    /// Converts a `ConfigFile` to `AipadConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(dedup) = file.dedup {
            if let Some(threshold) = dedup.similarity_threshold {
                config.dedup = config.dedup.with_threshold(threshold);
            }
            if let Some(fuzzy) = dedup.fuzzy_enabled {
                config.dedup = config.dedup.with_fuzzy(fuzzy);
            }
        }
        if let Some(copy) = file.sync.and_then(|s| s.copy_to_rules) {
            config.sync.copy_to_rules = copy;
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = AipadConfig::new();
        assert!(config.dedup.fuzzy_enabled);
        assert!(config.sync.copy_to_rules);
        assert_eq!(config.logging, LoggingSettings::default());
    }

    #[test]
    fn test_from_toml() {
        let config = AipadConfig::from_toml(
            r#"
            [dedup]
            similarity_threshold = 0.9
            fuzzy_enabled = false

            [sync]
            copy_to_rules = false

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert!(!config.dedup.fuzzy_enabled);
        assert!((config.dedup.similarity_threshold - 0.9).abs() < f64::EPSILON);
        assert!(!config.sync.copy_to_rules);
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        let err = AipadConfig::from_toml("[llm]\nprovider = \"x\"\n").unwrap_err();
        assert!(matches!(err, Error::OperationFailed { .. }));
    }

    #[test]
    fn test_no_file_gives_defaults() {
        let loaded = AipadConfig::load_with(None, no_env, None).unwrap();
        assert_eq!(loaded.config, AipadConfig::default());
        assert!(loaded.source.is_none());
        assert!(loaded.fallback_reason.is_none());
    }

    #[test]
    fn test_explicit_path_errors_propagate() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        let err = AipadConfig::load_with(Some(&missing), no_env, None).unwrap_err();
        assert!(err.is_not_found());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[dedup\n").unwrap();
        assert!(AipadConfig::load_with(Some(&bad), no_env, None).is_err());
    }

    #[test]
    fn test_env_path_is_explicit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[sync]\ncopy_to_rules = false\n").unwrap();
        let env_path = path.to_string_lossy().into_owned();

        let loaded = AipadConfig::load_with(
            None,
            |key| (key == CONFIG_PATH_ENV).then(|| env_path.clone()),
            None,
        )
        .unwrap();
        assert!(!loaded.config.sync.copy_to_rules);
        assert_eq!(loaded.source, Some(path));
    }

    #[test]
    fn test_broken_default_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        let loaded = AipadConfig::load_with(None, no_env, Some(path)).unwrap();
        assert_eq!(loaded.config, AipadConfig::default());
        assert!(loaded.fallback_reason.is_some());
    }

    #[test]
    fn test_env_overrides_win_over_file() {
        let config = AipadConfig::from_toml("[sync]\ncopy_to_rules = true\n")
            .unwrap()
            .with_overrides_from(|key| match key {
                "AIPAD_SYNC_COPY_RULES" => Some("0".to_string()),
                "AIPAD_DEDUP_THRESHOLD" => Some("0.5".to_string()),
                _ => None,
            });
        assert!(!config.sync.copy_to_rules);
        assert!((config.dedup.similarity_threshold - 0.5).abs() < f64::EPSILON);
    }
}
