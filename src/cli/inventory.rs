//! Part use CLI commands
//!
//! Attaching stocked parts to units and detaching them again.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::{TraxError, TraxResult};
use crate::services::{InventoryService, UseOutcome};
use crate::storage::Storage;

use super::{resolve_part, resolve_unit, single_match};

/// Part use subcommands
#[derive(Subcommand)]
pub enum UseCommands {
    /// Use a part on a unit, taking it from stock when available
    Attach {
        /// Part SKU or ID
        part: String,
        /// Unit title or ID
        unit: String,
        /// Quantity used
        #[arg(short, long, default_value = "1")]
        qty: u32,
        /// Notes (e.g. board position)
        #[arg(short, long, default_value = "")]
        notes: String,
    },
    /// Remove a part use, returning stock it took
    Remove {
        /// Part use ID
        part_use: String,
    },
    /// List uses still waiting on stock
    Pending,
}

/// Handle a part use command
pub fn handle_use_command(
    storage: &Storage,
    settings: &Settings,
    cmd: UseCommands,
) -> TraxResult<()> {
    let service = InventoryService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        UseCommands::Attach {
            part,
            unit,
            qty,
            notes,
        } => {
            let part = resolve_part(storage, &part)?;
            let unit = resolve_unit(storage, &unit)?;
            let result = service.attach(part.id, unit.id, qty, &notes)?;

            println!(
                "Attached {} x{} to {} ({})",
                part.sku,
                qty,
                unit.title,
                result.part_use.total_cost().format_with_symbol(symbol)
            );
            match result.outcome {
                UseOutcome::Decremented => {
                    println!("  Stock remaining: {}", result.qty_on_hand);
                }
                UseOutcome::PendingNoStock => {
                    println!(
                        "  Not enough stock ({} on hand); recorded as pending.",
                        result.qty_on_hand
                    );
                }
            }
            println!("  ID: {}", result.part_use.id);
        }

        UseCommands::Remove { part_use } => {
            let matches = storage
                .part_uses
                .find_where(|u| u.id.matches(&part_use))?;
            let found = single_match(matches, &part_use, TraxError::part_use_not_found)?;
            let result = service.remove(found.id)?;

            if result.credited {
                println!(
                    "Removed part use; {} returned to stock",
                    result.part_use.use_qty
                );
            } else {
                println!("Removed part use; no stock returned");
            }
        }

        UseCommands::Pending => {
            let pending = service.pending_uses()?;
            if pending.is_empty() {
                println!("No part uses waiting on stock.");
                return Ok(());
            }

            let parts = storage.parts.get_all()?;
            let units = storage.units.get_all()?;
            for part_use in &pending {
                let sku = part_use
                    .part_id
                    .and_then(|id| parts.iter().find(|p| p.id == id))
                    .map(|p| p.sku.as_str())
                    .unwrap_or("?");
                let title = units
                    .iter()
                    .find(|u| u.id == part_use.unit_id)
                    .map(|u| u.title.as_str())
                    .unwrap_or("?");
                println!(
                    "  {} x{} on {}  {}",
                    sku, part_use.use_qty, title, part_use.id
                );
            }
        }
    }

    Ok(())
}
