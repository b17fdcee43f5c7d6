//! Session lifecycle command handlers.

use super::{CmdResult, CommandContext, DISPLAY_TIME_FORMAT, print_sync_report};
use aipad::models::{SessionRecord, TargetRegistry, builtin_targets};
use aipad::services::SyncSelection;
use aipad::storage::fs::{atomic_write, ensure_dir};
use chrono::Local;

/// New command.
pub fn cmd_new(ctx: &CommandContext, provider: &str) -> CmdResult {
    let registry = TargetRegistry::new(builtin_targets(), ctx.custom_targets()?);
    let target = registry.lookup(provider)?;
    let store = ctx.store();

    println!("Initializing aipad session for provider: {provider}");
    if store.exists() {
        println!("  Replacing existing session record");
    }

    let record = SessionRecord::create_default(provider);
    store.save(&record)?;
    println!("  Initialized .aipad/state.json");

    store.ensure_scratchpad()?;
    println!("  Initialized .aipad/scratchpad.md");

    let config_path = ctx.paths().resolve(&target.config_file);
    if config_path.exists() {
        println!("  Provider config exists: {}", target.config_file);
    } else {
        if let Some(parent) = config_path.parent() {
            ensure_dir(parent)?;
        }
        let header = format!("# {} Configuration\n", target.config_file);
        atomic_write(&config_path, header.as_bytes())?;
        println!("  Created provider config: {}", target.config_file);
    }

    println!("Session {} started. You are now using: {provider}", record.session_id);
    Ok(())
}

/// Status command.
pub fn cmd_status(ctx: &CommandContext) -> CmdResult {
    let record = ctx.store().load()?;

    println!("aipad session status");
    println!("  Provider:    {}", record.current_provider);
    println!("  Session ID:  {}", record.session_id);
    println!(
        "  Created:     {}",
        record.created_at.with_timezone(&Local).format(DISPLAY_TIME_FORMAT)
    );
    println!(
        "  Last Sync:   {}",
        record.last_sync.with_timezone(&Local).format(DISPLAY_TIME_FORMAT)
    );
    println!("  Entries:     {} context(s)", record.entry_count());
    Ok(())
}

/// Sync command.
pub fn cmd_sync(ctx: &CommandContext, provider: Option<String>, all: bool) -> CmdResult {
    let selection = match (provider, all) {
        (_, true) => SyncSelection::All,
        (Some(id), false) => SyncSelection::Target(id),
        (None, false) => SyncSelection::Current,
    };

    println!("Syncing context...");
    let report = ctx.sync_service().sync(&selection, ctx.custom_targets()?)?;
    print_sync_report(&report)?;
    println!("Sync complete.");
    Ok(())
}

/// Use command.
pub fn cmd_use(ctx: &CommandContext, provider: &str) -> CmdResult {
    let report = ctx.sync_service().switch_to(provider, ctx.custom_targets()?)?;
    println!("Switched to provider: {provider}");
    print_sync_report(&report)?;
    println!("Provider switch complete.");
    Ok(())
}

/// Clean command.
pub fn cmd_clean(ctx: &CommandContext) -> CmdResult {
    println!("Cleaning synced context...");
    let reports = ctx.sync_service().clean(ctx.custom_targets()?)?;

    let mut failures = 0usize;
    for report in &reports {
        match &report.removed_copy {
            Ok(true) => println!(
                "  Removed {}",
                ctx.paths()
                    .rules_scratchpad_path(&report.config.rules_dir)
                    .display()
            ),
            Ok(false) => {}
            Err(e) => {
                failures += 1;
                println!("  Warning: {e}");
            }
        }
        match &report.cleared_block {
            Ok(Some(_)) => println!("  Cleared managed block in {}", report.config.config_file),
            Ok(None) => {}
            Err(e) => {
                failures += 1;
                println!("  Warning: could not clear {}: {e}", report.config.config_file);
            }
        }
    }

    if failures > 0 {
        return Err(format!("clean finished with {failures} warning(s)").into());
    }
    println!("Clean complete. The scratchpad in .aipad/ is preserved.");
    Ok(())
}
