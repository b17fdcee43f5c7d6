//! Command handlers module.
//!
//! This module organizes the CLI command implementations into separate files:
//! - `session.rs`: Session lifecycle commands (new, status, sync, use, clean)
//! - `entries.rs`: Scratchpad commands (convo, list, export)
//! - `providers.rs`: Custom provider management

mod entries;
mod providers;
mod session;

use aipad::config::AipadConfig;
use aipad::models::CustomTarget;
use aipad::services::SyncService;
use aipad::services::deduplication::DeduplicationService;
use aipad::storage::{PathManager, ProviderStore, SessionStore};
use aipad::{CaptureService, SyncReport};
use clap::Subcommand;

// Re-export command functions
pub use entries::{cmd_convo, cmd_export, cmd_list};
pub use providers::cmd_providers;
pub use session::{cmd_clean, cmd_new, cmd_status, cmd_sync, cmd_use};

/// Result type shared by command handlers.
pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Timestamp format for human-readable output.
pub const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Providers subcommands.
#[derive(Subcommand)]
pub enum ProvidersAction {
    /// Add a custom provider.
    Add {
        /// Provider name.
        name: String,
        /// Config file that receives the managed block (e.g. MYAI.md).
        config_file: String,
        /// Rules directory that receives the scratchpad copy (e.g. .myai/rules/).
        rules_dir: String,
    },

    /// Remove a custom provider.
    Remove {
        /// Provider name.
        name: String,
    },

    /// List built-in and custom providers.
    List,
}

/// Everything a command needs: effective config and the working layout.
pub struct CommandContext {
    config: AipadConfig,
    paths: PathManager,
}

impl CommandContext {
    /// Creates a context.
    pub const fn new(config: AipadConfig, paths: PathManager) -> Self {
        Self { config, paths }
    }

    /// Session record and scratchpad store.
    pub fn store(&self) -> SessionStore {
        SessionStore::new(self.paths.clone())
    }

    /// Custom provider store.
    pub fn provider_store(&self) -> ProviderStore {
        ProviderStore::new(&self.paths)
    }

    /// Loads the custom providers.
    pub fn custom_targets(&self) -> aipad::Result<Vec<CustomTarget>> {
        self.provider_store().load()
    }

    /// Capture service configured from `[dedup]`.
    pub fn capture_service(&self) -> CaptureService {
        CaptureService::new(
            self.store(),
            DeduplicationService::new(self.config.dedup.clone()),
        )
    }

    /// Sync service configured from `[sync]`.
    pub fn sync_service(&self) -> SyncService {
        SyncService::new(self.store()).with_copy_to_rules(self.config.sync.copy_to_rules)
    }

    /// Working layout.
    pub const fn paths(&self) -> &PathManager {
        &self.paths
    }
}

/// Prints a per-target sync report and fails if any target failed.
pub fn print_sync_report(report: &SyncReport) -> CmdResult {
    for target in &report.targets {
        match &target.result {
            Ok(outcome) => println!(
                "  ✓ {} -> {} ({outcome})",
                target.target, target.config.config_file
            ),
            Err(e) => println!("  ✗ {} -> {}: {e}", target.target, target.config.config_file),
        }
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(format!(
            "{} of {} target(s) failed to sync",
            report.failed(),
            report.targets.len()
        )
        .into())
    }
}
