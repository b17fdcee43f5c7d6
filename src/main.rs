//! Binary entry point for aipad.
//!
//! This binary provides the CLI interface for the aipad context scratchpad.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

mod commands;

use aipad::config::AipadConfig;
use aipad::observability::{self, LoggingConfig};
use aipad::storage::PathManager;
use clap::{Parser, Subcommand};
use commands::{CommandContext, ProvidersAction};
use std::path::PathBuf;
use std::process::ExitCode;

/// aipad - Shared context scratchpad for AI coding assistants.
#[derive(Parser)]
#[command(name = "aipad")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Working directory (default: current directory).
    #[arg(short = 'C', long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Start a new session for a provider.
    New {
        /// Provider to use (claude, antigravity, or a custom provider).
        provider: String,
    },

    /// Add conversation context to the scratchpad.
    Convo {
        /// The context to save.
        text: String,

        /// Accept near-duplicates. Exact duplicates are still skipped.
        #[arg(short, long)]
        force: bool,
    },

    /// Show conversation history.
    List,

    /// Show current provider and session info.
    Status,

    /// Sync the scratchpad into provider config files.
    Sync {
        /// Provider to sync (default: current provider).
        provider: Option<String>,

        /// Sync every enabled provider.
        #[arg(long, conflicts_with = "provider")]
        all: bool,
    },

    /// Switch to a different provider and sync to it.
    Use {
        /// Provider to switch to.
        provider: String,
    },

    /// Remove synced context from rules directories and config files.
    Clean,

    /// Export conversation history to a file.
    Export {
        /// Output file (.md, .txt or .json).
        file: Option<PathBuf>,
    },

    /// Manage custom providers.
    Providers {
        /// Providers subcommand.
        #[command(subcommand)]
        action: ProvidersAction,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match AipadConfig::load(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let logging = LoggingConfig::from_settings(&loaded.config.logging, cli.verbose);
    if let Err(e) = observability::init(&logging) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }
    if let Some(reason) = &loaded.fallback_reason {
        tracing::warn!(reason = %reason, "Ignoring default config file, using defaults");
    }
    tracing::debug!(source = ?loaded.source, "Configuration loaded");

    match run_command(cli, loaded.config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Runs the selected command.
fn run_command(cli: Cli, config: AipadConfig) -> Result<(), Box<dyn std::error::Error>> {
    let paths = match cli.dir {
        Some(dir) => PathManager::new(dir),
        None => PathManager::from_current_dir()?,
    };
    let ctx = CommandContext::new(config, paths);

    match cli.command {
        Commands::New { provider } => commands::cmd_new(&ctx, &provider),
        Commands::Convo { text, force } => commands::cmd_convo(&ctx, text, force),
        Commands::List => commands::cmd_list(&ctx),
        Commands::Status => commands::cmd_status(&ctx),
        Commands::Sync { provider, all } => commands::cmd_sync(&ctx, provider, all),
        Commands::Use { provider } => commands::cmd_use(&ctx, &provider),
        Commands::Clean => commands::cmd_clean(&ctx),
        Commands::Export { file } => commands::cmd_export(&ctx, file),
        Commands::Providers { action } => commands::cmd_providers(&ctx, action),
    }
}
