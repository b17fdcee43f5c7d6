//! Custom provider command handlers.

use super::{CmdResult, CommandContext, ProvidersAction};
use aipad::models::{CustomTarget, TargetRegistry, builtin_targets};

/// Providers command.
pub fn cmd_providers(ctx: &CommandContext, action: ProvidersAction) -> CmdResult {
    let store = ctx.provider_store();
    match action {
        ProvidersAction::Add {
            name,
            config_file,
            rules_dir,
        } => {
            store.add(CustomTarget::new(&name, &config_file, &rules_dir))?;
            println!("Added provider '{name}'");
            println!("  Config file: {config_file}");
            println!("  Rules dir:   {rules_dir}");
            println!("  Stored in:   {}", store.active_path()?.display());
        }
        ProvidersAction::Remove { name } => {
            store.remove(&name)?;
            println!("Removed provider '{name}'");
        }
        ProvidersAction::List => {
            let registry = TargetRegistry::new(builtin_targets(), store.load()?);
            println!("Built-in providers:");
            for (id, config) in registry.builtins() {
                println!("  {id:<14} {:<16} {}", config.config_file, config.rules_dir);
            }

            let enabled: Vec<&CustomTarget> =
                registry.custom().iter().filter(|t| t.enabled).collect();
            println!();
            if enabled.is_empty() {
                println!("No custom providers. Add one with 'aipad providers add'.");
            } else {
                println!("Custom providers:");
                for target in enabled {
                    println!(
                        "  {:<14} {:<16} {}",
                        target.name, target.config_file, target.rules_dir
                    );
                }
            }
        }
    }
    Ok(())
}
