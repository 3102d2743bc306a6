//! Labor timer CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::TraxResult;
use crate::services::{format_duration, TimeTrackerService, TimerTransition};
use crate::storage::Storage;

use super::resolve_unit;

/// Timer subcommands
#[derive(Subcommand)]
pub enum TimerCommands {
    /// Start the labor timer on a unit
    Start {
        /// Unit title or ID
        unit: String,
    },
    /// Stop the labor timer on a unit
    Stop {
        /// Unit title or ID
        unit: String,
    },
    /// Show timer state for one unit, or all running timers
    Status {
        /// Unit title or ID
        unit: Option<String>,
    },
}

/// Handle a timer command
pub fn handle_timer_command(
    storage: &Storage,
    settings: &mut Settings,
    cmd: TimerCommands,
) -> TraxResult<()> {
    let tracker = TimeTrackerService::new(storage);
    let paths = storage.paths();

    match cmd {
        TimerCommands::Start { unit } => {
            let found = resolve_unit(storage, &unit)?;
            match tracker.start_recording(found.id, settings, paths)? {
                TimerTransition::Started(entry) => {
                    println!(
                        "Timer started on {} at {}",
                        found.title,
                        entry.start.format("%H:%M:%S UTC")
                    );
                }
                TimerTransition::AlreadyRunning(entry) => {
                    println!(
                        "Timer already running on {} since {}",
                        found.title,
                        entry.start.format("%H:%M:%S UTC")
                    );
                }
                _ => {}
            }
        }

        TimerCommands::Stop { unit } => {
            let found = resolve_unit(storage, &unit)?;
            match tracker.stop_recording(found.id, settings, paths)? {
                TimerTransition::Stopped(entry) => {
                    let elapsed = entry.end.unwrap_or(entry.start) - entry.start;
                    println!(
                        "Timer stopped on {} after {}",
                        found.title,
                        format_duration(elapsed)
                    );
                    println!(
                        "  Total labor: {}",
                        format_duration(tracker.total_duration(found.id)?)
                    );
                }
                _ => println!("No timer running on {}", found.title),
            }
        }

        TimerCommands::Status { unit: Some(unit) } => {
            let found = resolve_unit(storage, &unit)?;
            let total = tracker.total_duration(found.id)?;
            let cost = tracker.labor_cost(found.id, settings.hourly_rate)?;
            let state = if tracker.is_running(found.id)? {
                "running"
            } else {
                "idle"
            };
            println!("{}: {}", found.title, state);
            println!(
                "  Total labor: {} ({})",
                format_duration(total),
                cost.format_with_symbol(&settings.currency_symbol)
            );
        }

        TimerCommands::Status { unit: None } => {
            let running = tracker.running_units()?;
            if running.is_empty() {
                println!("No timers running.");
                return Ok(());
            }

            println!("Running timers");
            for unit_id in running {
                if let (Some(unit), Some(entry)) =
                    (storage.units.get(unit_id)?, tracker.running_entry(unit_id)?)
                {
                    println!(
                        "  {}  since {}",
                        unit.title,
                        entry.start.format("%Y-%m-%d %H:%M UTC")
                    );
                }
            }
        }
    }

    Ok(())
}
