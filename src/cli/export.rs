//! Export CLI commands

use clap::Subcommand;
use std::path::PathBuf;

use crate::error::TraxResult;
use crate::export::export_units_csv_file;
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand)]
pub enum ExportCommands {
    /// Write a marketplace listing CSV of all units
    Csv {
        /// Output file
        path: PathBuf,
    },
}

/// Handle an export command
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> TraxResult<()> {
    match cmd {
        ExportCommands::Csv { path } => {
            let count = export_units_csv_file(storage, &path)?;
            println!("Exported {} unit(s) to {}", count, path.display());
        }
    }

    Ok(())
}
