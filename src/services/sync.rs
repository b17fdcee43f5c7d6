//! Context synchronization service.
//!
//! Propagates the scratchpad into sync targets. For each target:
//! 1. The rules directory is created and receives a verbatim copy of the
//!    scratchpad (unless disabled in config)
//! 2. The config file's managed block is replaced with the agent-awareness
//!    instructions followed by the scratchpad text
//!
//! Multi-target runs attempt every target and collect per-target results in
//! a [`SyncReport`] instead of stopping at the first failure.

use crate::models::{CustomTarget, SessionRecord, TargetConfig, TargetRegistry};
use crate::services::managed_block::{self, SpliceOutcome};
use crate::storage::SessionStore;
use crate::storage::fs::{atomic_write, ensure_dir};
use crate::{Error, Result};
use std::time::Instant;
use tracing::instrument;

/// Instructions placed at the top of every managed block so the assistant
/// knows how to read and save context.
pub const AGENT_AWARENESS_INSTRUCTIONS: &str = r#"## AIPad Context Management

This project uses **AIPad** for context switching between AI assistants.

### How to Save Context
When you complete a significant task or conversation milestone, save the context using:
```bash
aipad convo "Summary of what was accomplished"
```

### When to Save
- After completing a feature or bug fix
- Before switching to a different topic
- When the user requests a context save
- At natural conversation breakpoints

### Reading Context
The shared scratchpad is located at `.aipad/scratchpad.md`. Review it to understand prior context.
"#;

/// Heading between the instructions and the scratchpad text.
pub const SESSION_CONTEXT_HEADING: &str = "\n## Current Session Context\n\n";

/// Builds the managed block body for the given scratchpad text.
#[must_use]
pub fn build_block(scratchpad: &str) -> String {
    [AGENT_AWARENESS_INSTRUCTIONS, SESSION_CONTEXT_HEADING, scratchpad].concat()
}

/// Which targets a sync run writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncSelection {
    /// The session's current provider.
    Current,
    /// One named target.
    Target(String),
    /// Every enabled target, aliases collapsed.
    All,
}

/// Result of syncing one target.
#[derive(Debug)]
pub struct TargetReport {
    /// Target id.
    pub target: String,
    /// Destination paths.
    pub config: TargetConfig,
    /// What happened to the config file, or why the target failed.
    pub result: Result<SpliceOutcome>,
}

/// Per-target results of a sync run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// One entry per attempted target, in attempt order.
    pub targets: Vec<TargetReport>,
}

impl SyncReport {
    /// Number of targets that synced.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.targets.iter().filter(|t| t.result.is_ok()).count()
    }

    /// Number of targets that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.targets.len() - self.succeeded()
    }

    /// Returns true if every attempted target synced.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Result of cleaning one target.
#[derive(Debug)]
pub struct CleanReport {
    /// Target id.
    pub target: String,
    /// Destination paths.
    pub config: TargetConfig,
    /// Whether a rules-directory copy was removed.
    pub removed_copy: Result<bool>,
    /// What happened to the config file. `None` if it does not exist.
    pub cleared_block: Result<Option<SpliceOutcome>>,
}

/// Service for synchronizing the scratchpad into sync targets.
#[derive(Debug, Clone)]
pub struct SyncService {
    /// Session record and scratchpad access.
    store: SessionStore,
    /// Whether rules directories receive a scratchpad copy.
    copy_to_rules: bool,
}

impl SyncService {
    /// Creates a new sync service.
    #[must_use]
    pub const fn new(store: SessionStore) -> Self {
        Self {
            store,
            copy_to_rules: true,
        }
    }

    /// Sets whether rules directories receive a scratchpad copy.
    #[must_use]
    pub const fn with_copy_to_rules(mut self, copy_to_rules: bool) -> Self {
        self.copy_to_rules = copy_to_rules;
        self
    }

    /// Syncs the scratchpad to the selected targets.
    ///
    /// `last_sync` is updated if at least one target synced.
    ///
    /// # Errors
    ///
    /// Returns an error only for problems that affect every target: a
    /// missing session or scratchpad, an unknown target id, or a failure to
    /// save the session record. Per-target failures are in the report.
    #[instrument(skip(self, custom), fields(operation = "sync"))]
    pub fn sync(
        &self,
        selection: &SyncSelection,
        custom: Vec<CustomTarget>,
    ) -> Result<SyncReport> {
        let mut record = self.store.load()?;
        let registry = TargetRegistry::new(record.providers.clone(), custom);
        let targets = select(&registry, &record, selection)?;
        self.sync_record(&mut record, targets)
    }

    /// Makes `target_id` the current provider and syncs to it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTarget`] before anything is written if the id
    /// does not resolve, plus the errors of [`Self::sync`].
    #[instrument(skip(self, custom), fields(operation = "use_target"))]
    pub fn switch_to(&self, target_id: &str, custom: Vec<CustomTarget>) -> Result<SyncReport> {
        let mut record = self.store.load()?;
        let registry = TargetRegistry::new(record.providers.clone(), custom);
        let config = registry.lookup(target_id)?;

        record.set_current_provider(target_id);
        self.store.save(&record)?;
        tracing::info!(target_id, "Switched current provider");

        self.sync_record(&mut record, vec![(target_id.to_string(), config)])
    }

    /// Removes rules-directory copies and empties the managed block of every
    /// enabled target. The session scratchpad is kept.
    ///
    /// Config files that do not exist are left absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no session.
    #[instrument(skip(self, custom), fields(operation = "clean"))]
    pub fn clean(&self, custom: Vec<CustomTarget>) -> Result<Vec<CleanReport>> {
        let record = self.store.load()?;
        let registry = TargetRegistry::new(record.providers, custom);
        let paths = self.store.paths();

        let reports = registry
            .distinct()
            .into_iter()
            .map(|(target, config)| {
                let copy = paths.rules_scratchpad_path(&config.rules_dir);
                let removed_copy = match std::fs::remove_file(&copy) {
                    Ok(()) => Ok(true),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
                    Err(e) => Err(Error::io("removing", &copy, e)),
                };

                let config_path = paths.resolve(&config.config_file);
                let cleared_block = if config_path.exists() {
                    managed_block::apply(&config_path, "").map(Some)
                } else {
                    Ok(None)
                };

                tracing::debug!(target_id = %target, "Cleaned target");
                CleanReport {
                    target,
                    config,
                    removed_copy,
                    cleared_block,
                }
            })
            .collect();
        Ok(reports)
    }

    fn sync_record(
        &self,
        record: &mut SessionRecord,
        targets: Vec<(String, TargetConfig)>,
    ) -> Result<SyncReport> {
        let scratchpad = self.store.read_scratchpad()?;
        let block = build_block(&scratchpad);

        let mut report = SyncReport::default();
        for (target, config) in targets {
            let start = Instant::now();
            let result = self.sync_target(&config, &scratchpad, &block);
            let status = match &result {
                Ok(outcome) => {
                    tracing::info!(target_id = %target, outcome = %outcome, "Synced target");
                    "success"
                }
                Err(e) => {
                    tracing::warn!(target_id = %target, error = %e, "Target sync failed");
                    "error"
                }
            };
            metrics::counter!("sync_targets_total", "status" => status).increment(1);
            metrics::histogram!("sync_target_duration_ms")
                .record(start.elapsed().as_secs_f64() * 1000.0);
            report.targets.push(TargetReport {
                target,
                config,
                result,
            });
        }

        if report.succeeded() > 0 {
            record.touch_sync();
            self.store.save(record)?;
        }
        Ok(report)
    }

    fn sync_target(
        &self,
        config: &TargetConfig,
        scratchpad: &str,
        block: &str,
    ) -> Result<SpliceOutcome> {
        let paths = self.store.paths();
        if self.copy_to_rules {
            ensure_dir(&paths.resolve(&config.rules_dir))?;
            atomic_write(
                &paths.rules_scratchpad_path(&config.rules_dir),
                scratchpad.as_bytes(),
            )?;
        }
        managed_block::apply(&paths.resolve(&config.config_file), block)
    }
}

fn select(
    registry: &TargetRegistry,
    record: &SessionRecord,
    selection: &SyncSelection,
) -> Result<Vec<(String, TargetConfig)>> {
    match selection {
        SyncSelection::Current => {
            let id = &record.current_provider;
            Ok(vec![(id.clone(), registry.lookup(id)?)])
        }
        SyncSelection::Target(id) => Ok(vec![(id.clone(), registry.lookup(id)?)]),
        SyncSelection::All => Ok(registry.distinct()),
    }
}
