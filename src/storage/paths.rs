//! Centralized path management for aipad storage locations.
//!
//! Everything aipad owns lives under a hidden `.aipad/` directory in the
//! working tree:
//!
//! ```text
//! <root>/.aipad/state.json       session record
//! <root>/.aipad/scratchpad.md    context log
//! <root>/.aipad/providers.json   project-local custom targets (optional)
//! ~/.aipad/providers.json        user-level custom targets (fallback)
//! ```
//!
//! Target config files and rules directories are resolved relative to the
//! working root.

use crate::Result;
use crate::storage::fs::ensure_dir;
use std::path::{Path, PathBuf};

/// Name of the hidden aipad directory.
pub const AIPAD_DIR_NAME: &str = ".aipad";

/// Name of the session record file.
pub const STATE_FILE_NAME: &str = "state.json";

/// Name of the scratchpad file.
pub const SCRATCHPAD_FILE_NAME: &str = "scratchpad.md";

/// Name of the custom target registry file.
pub const PROVIDERS_FILE_NAME: &str = "providers.json";

/// Name of the scratchpad copy placed in each target's rules directory.
pub const RULES_SCRATCHPAD_NAME: &str = "scratchpad.md";

/// Manages storage paths for one working directory.
#[derive(Debug, Clone)]
pub struct PathManager {
    root: PathBuf,
    aipad_dir: PathBuf,
}

impl PathManager {
    /// Creates a manager rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let aipad_dir = root.join(AIPAD_DIR_NAME);
        Self { root, aipad_dir }
    }

    /// Creates a manager rooted at the process working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined.
    pub fn from_current_dir() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| crate::Error::io("resolving working directory", ".", e))?;
        Ok(Self::new(cwd))
    }

    /// Working root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/.aipad`
    #[must_use]
    pub fn aipad_dir(&self) -> &Path {
        &self.aipad_dir
    }

    /// `<root>/.aipad/state.json`
    #[must_use]
    pub fn state_path(&self) -> PathBuf {
        self.aipad_dir.join(STATE_FILE_NAME)
    }

    /// `<root>/.aipad/scratchpad.md`
    #[must_use]
    pub fn scratchpad_path(&self) -> PathBuf {
        self.aipad_dir.join(SCRATCHPAD_FILE_NAME)
    }

    /// `<root>/.aipad/providers.json`
    #[must_use]
    pub fn local_providers_path(&self) -> PathBuf {
        self.aipad_dir.join(PROVIDERS_FILE_NAME)
    }

    /// `~/.aipad/providers.json`, if a home directory can be resolved.
    #[must_use]
    pub fn home_providers_path() -> Option<PathBuf> {
        directories::BaseDirs::new().map(|dirs| {
            dirs.home_dir()
                .join(AIPAD_DIR_NAME)
                .join(PROVIDERS_FILE_NAME)
        })
    }

    /// Resolves a path from the target registry against the working root.
    ///
    /// Absolute paths are returned unchanged.
    #[must_use]
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Path of the scratchpad copy inside a rules directory.
    #[must_use]
    pub fn rules_scratchpad_path(&self, rules_dir: impl AsRef<Path>) -> PathBuf {
        self.resolve(rules_dir).join(RULES_SCRATCHPAD_NAME)
    }

    /// Ensures `.aipad/` exists.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_aipad_dir(&self) -> Result<()> {
        ensure_dir(&self.aipad_dir)
    }
}
