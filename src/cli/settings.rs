//! Settings CLI commands

use clap::{Subcommand, ValueEnum};

use crate::config::paths::TraxPaths;
use crate::config::settings::Settings;
use crate::error::TraxResult;

use super::parse_money;

#[derive(Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

/// Settings subcommands
#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show current settings
    Show,
    /// Set the hourly labor rate (e.g. "15.00")
    Rate { amount: String },
    /// Turn the daily backup reminder on or off
    Reminder { state: Toggle },
}

/// Handle a settings command
pub fn handle_settings_command(
    paths: &TraxPaths,
    settings: &mut Settings,
    cmd: SettingsCommands,
) -> TraxResult<()> {
    match cmd {
        SettingsCommands::Show => {
            let symbol = settings.currency_symbol.as_str();
            println!("Settings");
            println!("========");
            println!(
                "  Hourly rate:     {}",
                settings.hourly_rate.format_with_symbol(symbol)
            );
            println!(
                "  Backup reminder: {}",
                if settings.backup_reminder_enabled { "on" } else { "off" }
            );
            println!(
                "  Last backup:     {}",
                settings
                    .last_backup_at
                    .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                    .unwrap_or_else(|| "never".to_string())
            );
            if !settings.last_action_text.is_empty() {
                println!("  Last action:     {}", settings.last_action_text);
            }
        }

        SettingsCommands::Rate { amount } => {
            settings.hourly_rate = parse_money(&amount, "hourly rate")?;
            settings.save(paths)?;
            println!(
                "Hourly rate set to {}",
                settings.hourly_rate.format_with_symbol(&settings.currency_symbol)
            );
        }

        SettingsCommands::Reminder { state } => {
            settings.backup_reminder_enabled = matches!(state, Toggle::On);
            settings.save(paths)?;
            println!(
                "Backup reminder {}",
                if settings.backup_reminder_enabled { "enabled" } else { "disabled" }
            );
        }
    }

    Ok(())
}
