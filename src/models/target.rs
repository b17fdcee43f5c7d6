//! Sync targets: the assistant config files that receive the managed block.
//!
//! Two registries exist side by side:
//! - **built-in**: a closed, constant set (`claude`, `antigravity`, `ag`)
//!   persisted in every session record
//! - **custom**: an open list loaded from `providers.json`
//!
//! They are combined by [`merge_targets`], a pure function evaluated on every
//! lookup. Built-ins always win a name collision.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Built-in targets as `(id, config file, rules directory)`.
pub const BUILTIN_TARGETS: &[(&str, &str, &str)] = &[
    ("claude", "CLAUDE.md", ".claude/rules/"),
    ("antigravity", "AGENTS.md", ".agent/rules/"),
    ("ag", "AGENTS.md", ".agent/rules/"),
];

/// Destination paths for a target, relative to the working root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Config file that receives the managed block.
    pub config_file: String,
    /// Directory that receives a copy of the scratchpad.
    pub rules_dir: String,
}

impl TargetConfig {
    /// Creates a target config.
    #[must_use]
    pub fn new(config_file: impl Into<String>, rules_dir: impl Into<String>) -> Self {
        Self {
            config_file: config_file.into(),
            rules_dir: rules_dir.into(),
        }
    }
}

/// A user-defined target as stored in `providers.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTarget {
    /// Unique identifier.
    pub name: String,
    /// Config file that receives the managed block.
    pub config_file: String,
    /// Directory that receives a copy of the scratchpad.
    pub rules_dir: String,
    /// Disabled targets are kept on disk but ignored at lookup.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl CustomTarget {
    /// Creates an enabled custom target.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        config_file: impl Into<String>,
        rules_dir: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            config_file: config_file.into(),
            rules_dir: rules_dir.into(),
            enabled: true,
        }
    }

    /// The destination paths of this target.
    #[must_use]
    pub fn config(&self) -> TargetConfig {
        TargetConfig::new(&self.config_file, &self.rules_dir)
    }
}

/// Returns true if `id` names a built-in target.
#[must_use]
pub fn is_builtin(id: &str) -> bool {
    BUILTIN_TARGETS.iter().any(|(name, _, _)| *name == id)
}

/// Built-in targets with their fixed defaults.
#[must_use]
pub fn builtin_targets() -> BTreeMap<String, TargetConfig> {
    BUILTIN_TARGETS
        .iter()
        .map(|(id, file, rules)| ((*id).to_string(), TargetConfig::new(*file, *rules)))
        .collect()
}

/// Merges a base map (built-ins) with enabled custom targets.
///
/// Disabled custom targets are skipped; custom targets never replace an entry
/// already present in `base`.
#[must_use]
pub fn merge_targets(
    base: &BTreeMap<String, TargetConfig>,
    custom: &[CustomTarget],
) -> BTreeMap<String, TargetConfig> {
    let mut merged = base.clone();
    for target in custom.iter().filter(|t| t.enabled) {
        if merged.contains_key(&target.name) {
            tracing::warn!(target_id = %target.name, "Custom target shadows a built-in, ignoring");
            continue;
        }
        merged.insert(target.name.clone(), target.config());
    }
    merged
}

/// Lookup view over built-in and custom targets.
#[derive(Debug, Clone)]
pub struct TargetRegistry {
    base: BTreeMap<String, TargetConfig>,
    custom: Vec<CustomTarget>,
}

impl TargetRegistry {
    /// Creates a registry from a base map and a custom list.
    ///
    /// Built-ins missing from `base` are filled in with their defaults.
    #[must_use]
    pub fn new(base: BTreeMap<String, TargetConfig>, custom: Vec<CustomTarget>) -> Self {
        let mut base = base;
        for (id, config) in builtin_targets() {
            base.entry(id).or_insert(config);
        }
        Self { base, custom }
    }

    /// Registry with built-ins only.
    #[must_use]
    pub fn builtin_only() -> Self {
        Self::new(builtin_targets(), Vec::new())
    }

    /// The custom targets as loaded, including disabled ones.
    #[must_use]
    pub fn custom(&self) -> &[CustomTarget] {
        &self.custom
    }

    /// Built-in entries as configured for this session.
    #[must_use]
    pub const fn builtins(&self) -> &BTreeMap<String, TargetConfig> {
        &self.base
    }

    /// All enabled targets keyed by id.
    #[must_use]
    pub fn merged(&self) -> BTreeMap<String, TargetConfig> {
        merge_targets(&self.base, &self.custom)
    }

    /// Looks up a target by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTarget`] if no enabled target has that id.
    pub fn lookup(&self, id: &str) -> Result<TargetConfig> {
        self.merged()
            .remove(id)
            .ok_or_else(|| Error::UnknownTarget(id.to_string()))
    }

    /// Returns true if `id` resolves to an enabled target.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.merged().contains_key(id)
    }

    /// Enabled targets with aliases collapsed.
    ///
    /// Ids that point at the same config file and rules directory (such as
    /// `antigravity` and `ag`) are written once; the first id in sorted order
    /// represents the group.
    #[must_use]
    pub fn distinct(&self) -> Vec<(String, TargetConfig)> {
        let mut seen = std::collections::BTreeSet::new();
        self.merged()
            .into_iter()
            .filter(|(_, config)| seen.insert(config.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_defaults() {
        let builtins = builtin_targets();
        assert_eq!(builtins["claude"], TargetConfig::new("CLAUDE.md", ".claude/rules/"));
        assert_eq!(builtins["antigravity"], TargetConfig::new("AGENTS.md", ".agent/rules/"));
        assert_eq!(builtins["ag"], builtins["antigravity"]);
        assert!(is_builtin("claude"));
        assert!(!is_builtin("cursor"));
    }

    #[test]
    fn test_merge_adds_enabled_custom_targets() {
        let custom = vec![
            CustomTarget::new("myai", "MYAI.md", ".myai/rules/"),
            CustomTarget {
                enabled: false,
                ..CustomTarget::new("off", "OFF.md", ".off/")
            },
        ];
        let merged = merge_targets(&builtin_targets(), &custom);
        assert_eq!(merged["myai"], TargetConfig::new("MYAI.md", ".myai/rules/"));
        assert!(!merged.contains_key("off"));
        assert_eq!(merged.len(), BUILTIN_TARGETS.len() + 1);
    }

    #[test]
    fn test_builtin_wins_name_collision() {
        let custom = vec![CustomTarget::new("claude", "OTHER.md", ".other/")];
        let merged = merge_targets(&builtin_targets(), &custom);
        assert_eq!(merged["claude"].config_file, "CLAUDE.md");
    }

    #[test]
    fn test_lookup_unknown_target() {
        let registry = TargetRegistry::builtin_only();
        let err = registry.lookup("cursor").unwrap_err();
        assert!(matches!(err, Error::UnknownTarget(ref id) if id == "cursor"));
    }

    #[test]
    fn test_registry_restores_missing_builtins() {
        let mut base = BTreeMap::new();
        base.insert("claude".to_string(), TargetConfig::new("docs/CLAUDE.md", ".claude/rules/"));
        let registry = TargetRegistry::new(base, Vec::new());

        assert_eq!(registry.lookup("claude").unwrap().config_file, "docs/CLAUDE.md");
        assert!(registry.contains("antigravity"));
        assert!(registry.contains("ag"));
    }

    #[test]
    fn test_distinct_collapses_aliases() {
        let registry = TargetRegistry::new(
            builtin_targets(),
            vec![CustomTarget::new("myai", "MYAI.md", ".myai/rules/")],
        );
        let ids: Vec<String> = registry.distinct().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["ag", "claude", "myai"]);
    }

    #[test]
    fn test_custom_target_enabled_defaults_true() {
        let json = r#"{"name":"x","config_file":"X.md","rules_dir":".x/"}"#;
        let target: CustomTarget = serde_json::from_str(json).unwrap();
        assert!(target.enabled);
    }
}
