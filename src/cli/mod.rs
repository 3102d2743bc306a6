//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod export;
pub mod inventory;
pub mod part;
pub mod photo;
pub mod settings;
pub mod supply;
pub mod task;
pub mod timer;
pub mod unit;

pub use backup::{handle_backup_command, BackupCommands};
pub use export::{handle_export_command, ExportCommands};
pub use inventory::{handle_use_command, UseCommands};
pub use part::{handle_part_command, PartCommands};
pub use photo::{handle_photo_command, PhotoCommands};
pub use settings::{handle_settings_command, SettingsCommands};
pub use supply::{handle_supply_command, SupplyCommands};
pub use task::{handle_task_command, TaskCommands};
pub use timer::{handle_timer_command, TimerCommands};
pub use unit::{handle_unit_command, UnitCommands};

use chrono::NaiveDate;

use crate::error::{TraxError, TraxResult};
use crate::models::{Money, Part, Unit};
use crate::services::{PartService, UnitService};
use crate::storage::Storage;

/// Parse a money argument such as "35", "35.50" or "$35.50"
pub(crate) fn parse_money(input: &str, field: &str) -> TraxResult<Money> {
    Money::parse(input).map_err(|e| {
        TraxError::Validation(format!(
            "Invalid {}: '{}'. Use format like '35.00' or '35'. Error: {}",
            field, input, e
        ))
    })
}

/// Parse a date argument in YYYY-MM-DD form
pub(crate) fn parse_date(input: &str) -> TraxResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        TraxError::Validation(format!(
            "Invalid date: '{}'. Use YYYY-MM-DD format.",
            input
        ))
    })
}

/// Look up a unit by title or id
pub(crate) fn resolve_unit(storage: &Storage, identifier: &str) -> TraxResult<Unit> {
    UnitService::new(storage)
        .find(identifier)?
        .ok_or_else(|| TraxError::unit_not_found(identifier))
}

/// Look up a part by SKU or id
pub(crate) fn resolve_part(storage: &Storage, identifier: &str) -> TraxResult<Part> {
    PartService::new(storage)
        .find(identifier)?
        .ok_or_else(|| TraxError::part_not_found(identifier))
}

/// Pick the single record matching an id argument
pub(crate) fn single_match<T>(
    mut matches: Vec<T>,
    identifier: &str,
    not_found: fn(String) -> TraxError,
) -> TraxResult<T> {
    match matches.len() {
        0 => Err(not_found(identifier.to_string())),
        1 => Ok(matches.remove(0)),
        n => Err(TraxError::Validation(format!(
            "'{}' matches {} records; use the full id",
            identifier, n
        ))),
    }
}
