//! Persistence for user-defined sync targets (`providers.json`).
//!
//! The project-local file wins when it exists; otherwise the user-level file
//! under the home directory is read and written.

use super::fs::{atomic_write, ensure_dir, read_optional};
use super::paths::PathManager;
use crate::models::{CustomTarget, is_builtin};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::instrument;

/// On-disk shape of `providers.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidersFile {
    /// Custom targets in insertion order.
    #[serde(default)]
    pub providers: Vec<CustomTarget>,
}

/// Loads and edits the custom target registry.
#[derive(Debug, Clone)]
pub struct ProviderStore {
    local_path: PathBuf,
    home_path: Option<PathBuf>,
}

impl ProviderStore {
    /// Creates a store for the given layout, falling back to
    /// `~/.aipad/providers.json`.
    #[must_use]
    pub fn new(paths: &PathManager) -> Self {
        Self {
            local_path: paths.local_providers_path(),
            home_path: PathManager::home_providers_path(),
        }
    }

    /// Overrides the user-level fallback path.
    #[must_use]
    pub fn with_home_path(mut self, home_path: Option<PathBuf>) -> Self {
        self.home_path = home_path;
        self
    }

    /// The file that is read and written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if no local file exists and no home
    /// directory can be resolved.
    pub fn active_path(&self) -> Result<PathBuf> {
        if self.local_path.is_file() {
            return Ok(self.local_path.clone());
        }
        self.home_path.clone().ok_or_else(|| {
            Error::InvalidInput("no home directory for the custom target registry".to_string())
        })
    }

    /// Loads the custom targets. A missing file yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedState`] if the file does not parse, or
    /// [`Error::IoFailure`] if it cannot be read.
    #[instrument(skip(self), fields(operation = "load_providers"))]
    pub fn load(&self) -> Result<Vec<CustomTarget>> {
        let Ok(path) = self.active_path() else {
            return Ok(Vec::new());
        };
        let Some(text) = read_optional(&path)? else {
            return Ok(Vec::new());
        };
        let file: ProvidersFile =
            serde_json::from_str(&text).map_err(|e| Error::MalformedState {
                path: path.clone(),
                cause: e.to_string(),
            })?;
        tracing::debug!(path = %path.display(), count = file.providers.len(), "Loaded custom targets");
        Ok(file.providers)
    }

    /// Writes the custom targets to the active file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IoFailure`] if the directory or file cannot be written.
    pub fn save(&self, providers: &[CustomTarget]) -> Result<()> {
        let path = self.active_path()?;
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let file = ProvidersFile {
            providers: providers.to_vec(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| Error::MalformedState {
            path: path.clone(),
            cause: e.to_string(),
        })?;
        atomic_write(&path, json.as_bytes())
    }

    /// Adds an enabled custom target.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if any field is empty, the name is a
    /// built-in, or a custom target with that name already exists.
    #[instrument(skip(self, target), fields(operation = "add_provider", name = %target.name))]
    pub fn add(&self, target: CustomTarget) -> Result<()> {
        validate(&target)?;
        let mut providers = self.load()?;
        if providers.iter().any(|p| p.name == target.name) {
            return Err(Error::InvalidInput(format!(
                "provider '{}' already exists",
                target.name
            )));
        }
        providers.push(target);
        self.save(&providers)
    }

    /// Removes a custom target by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for built-in names and
    /// [`Error::UnknownTarget`] if no custom target has that name.
    #[instrument(skip(self), fields(operation = "remove_provider"))]
    pub fn remove(&self, name: &str) -> Result<CustomTarget> {
        if is_builtin(name) {
            return Err(Error::InvalidInput(format!(
                "cannot remove built-in provider '{name}'"
            )));
        }
        let mut providers = self.load()?;
        let index = providers
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| Error::UnknownTarget(name.to_string()))?;
        let removed = providers.remove(index);
        self.save(&providers)?;
        Ok(removed)
    }
}

fn validate(target: &CustomTarget) -> Result<()> {
    if target.name.trim().is_empty()
        || target.config_file.trim().is_empty()
        || target.rules_dir.trim().is_empty()
    {
        return Err(Error::InvalidInput(
            "provider name, config file and rules directory must be non-empty".to_string(),
        ));
    }
    if is_builtin(&target.name) {
        return Err(Error::InvalidInput(format!(
            "cannot override built-in provider '{}'",
            target.name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Fixture {
        _work: TempDir,
        home: TempDir,
        paths: PathManager,
    }

    impl Fixture {
        fn new() -> Self {
            let work = TempDir::new().unwrap();
            let home = TempDir::new().unwrap();
            let paths = PathManager::new(work.path());
            Self {
                _work: work,
                home,
                paths,
            }
        }

        fn home_file(&self) -> PathBuf {
            self.home.path().join(".aipad").join("providers.json")
        }

        fn store(&self) -> ProviderStore {
            ProviderStore::new(&self.paths).with_home_path(Some(self.home_file()))
        }
    }

    #[test]
    fn test_missing_registry_is_empty() {
        let fx = Fixture::new();
        assert!(fx.store().load().unwrap().is_empty());
    }

    #[test]
    fn test_add_writes_home_file_when_no_local_file() {
        let fx = Fixture::new();
        fx.store()
            .add(CustomTarget::new("myai", "MYAI.md", ".myai/rules/"))
            .unwrap();

        assert!(fx.home_file().is_file());
        let loaded = fx.store().load().unwrap();
        assert_eq!(loaded, vec![CustomTarget::new("myai", "MYAI.md", ".myai/rules/")]);
    }

    #[test]
    fn test_local_file_takes_precedence() {
        let fx = Fixture::new();
        fx.store()
            .add(CustomTarget::new("home", "HOME.md", ".home/"))
            .unwrap();

        fx.paths.ensure_aipad_dir().unwrap();
        std::fs::write(fx.paths.local_providers_path(), r#"{"providers":[]}"#).unwrap();

        let store = fx.store();
        assert_eq!(store.active_path().unwrap(), fx.paths.local_providers_path());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_add_rejects_builtin_and_duplicate() {
        let fx = Fixture::new();
        let store = fx.store();

        let err = store
            .add(CustomTarget::new("claude", "X.md", ".x/"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        store.add(CustomTarget::new("myai", "MYAI.md", ".myai/")).unwrap();
        let err = store
            .add(CustomTarget::new("myai", "OTHER.md", ".other/"))
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_add_rejects_empty_fields() {
        let fx = Fixture::new();
        let err = fx.store().add(CustomTarget::new("x", " ", ".x/")).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_remove() {
        let fx = Fixture::new();
        let store = fx.store();
        store.add(CustomTarget::new("myai", "MYAI.md", ".myai/")).unwrap();

        assert_eq!(store.remove("myai").unwrap().name, "myai");
        assert!(store.load().unwrap().is_empty());
        assert!(matches!(store.remove("myai"), Err(Error::UnknownTarget(_))));
        assert!(matches!(store.remove("claude"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_malformed_registry() {
        let fx = Fixture::new();
        fx.paths.ensure_aipad_dir().unwrap();
        std::fs::write(fx.paths.local_providers_path(), "[1,2").unwrap();
        assert!(matches!(
            fx.store().load(),
            Err(Error::MalformedState { .. })
        ));
    }
}
