//! Scratchpad command handlers.

use super::{CmdResult, CommandContext};
use aipad::CaptureRequest;
use aipad::models::CaptureOutcome;
use aipad::services::deduplication::DuplicateReason;
use aipad::services::export::default_export_name;
use aipad::services::scratchpad::parse_entries;
use aipad::services::export_to;
use chrono::Local;
use std::path::PathBuf;

/// Preview width in `list` output.
const PREVIEW_CHARS: usize = 80;

/// Convo command.
pub fn cmd_convo(ctx: &CommandContext, text: String, force: bool) -> CmdResult {
    let request = CaptureRequest::new(text).with_force(force);
    match ctx.capture_service().capture(request)? {
        CaptureOutcome::Added { entry_count, .. } => {
            println!("Context added to scratchpad ({entry_count} total).");
        }
        CaptureOutcome::Duplicate(check) => match check.reason {
            Some(DuplicateReason::SimilarContent) => {
                println!(
                    "Similar content already in scratchpad ({:.0}% match). Skipping addition.",
                    check.similarity_score.unwrap_or_default() * 100.0
                );
                if let Some(matched) = check.matched_text {
                    println!("  Existing: {matched}");
                }
                println!("  Use --force to add it anyway.");
            }
            _ => println!("Duplicate content detected. Skipping addition."),
        },
    }
    Ok(())
}

/// List command.
pub fn cmd_list(ctx: &CommandContext) -> CmdResult {
    let store = ctx.store();
    store.load()?;
    let scratchpad = store.read_scratchpad()?;

    let entries = parse_entries(&scratchpad);
    if entries.is_empty() {
        println!("Scratchpad is empty. Use 'aipad convo \"<text>\"' to add context.");
        return Ok(());
    }

    println!("Conversation history");
    println!();
    for (i, entry) in entries.iter().enumerate() {
        println!("  [{}] {}", i + 1, entry.timestamp);
        println!("      {}", entry.preview(PREVIEW_CHARS));
        println!();
    }
    Ok(())
}

/// Export command.
pub fn cmd_export(ctx: &CommandContext, file: Option<PathBuf>) -> CmdResult {
    let file = file.unwrap_or_else(|| PathBuf::from(default_export_name(&Local::now())));
    let summary = export_to(&ctx.store(), &file)?;

    println!("Exported conversation history to: {}", summary.path.display());
    println!("  Session: {}", summary.session_id);
    println!("  Entries: {}", summary.entries);
    println!("  Format:  {}", summary.format.as_str());
    Ok(())
}
