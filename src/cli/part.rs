//! Part CLI commands
//!
//! Repair part inventory: creation, editing, restocking and deletion.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::part::{format_part_details, format_part_list};
use crate::error::TraxResult;
use crate::services::{InventoryService, NewPart, PartService};
use crate::storage::Storage;

use super::{parse_money, resolve_part};

/// Part subcommands
#[derive(Subcommand)]
pub enum PartCommands {
    /// Add a part to inventory
    Add {
        /// Part name
        name: String,
        /// SKU (must be unique)
        sku: String,
        #[arg(short, long)]
        brand: Option<String>,
        /// Quantity on hand
        #[arg(short, long, default_value = "0")]
        qty: u32,
        /// Cost per piece (e.g. "2.50")
        #[arg(short, long, default_value = "0")]
        cost: String,
        #[arg(short, long, default_value = "")]
        notes: String,
    },
    /// List parts
    List {
        /// Filter by name or SKU
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show part details
    Show {
        /// SKU or ID
        part: String,
    },
    /// Edit a part
    Edit {
        /// SKU or ID
        part: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        sku: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        /// Cost per piece
        #[arg(long)]
        cost: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Add stock to a part
    Restock {
        /// SKU or ID
        part: String,
        qty: u32,
    },
    /// Delete a part (uses keep their cost but lose the link)
    Delete {
        /// SKU or ID
        part: String,
    },
}

/// Handle a part command
pub fn handle_part_command(
    storage: &Storage,
    settings: &Settings,
    cmd: PartCommands,
) -> TraxResult<()> {
    let service = PartService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        PartCommands::Add {
            name,
            sku,
            brand,
            qty,
            cost,
            notes,
        } => {
            let part = service.create(NewPart {
                name,
                sku,
                brand,
                qty_on_hand: qty,
                cost: parse_money(&cost, "cost")?,
                notes,
            })?;
            println!("Added part: {} ({})", part.name, part.sku);
            println!("  In Stock: {}", part.qty_on_hand);
            println!("  Cost:     {}", part.cost.format_with_symbol(symbol));
            println!("  ID:       {}", part.id.to_uuid_string());
        }

        PartCommands::List { search } => {
            let parts = match search {
                Some(text) => service.search(&text)?,
                None => service.list()?,
            };
            print!("{}", format_part_list(&parts, symbol));
        }

        PartCommands::Show { part } => {
            let found = resolve_part(storage, &part)?;
            let uses = storage.part_uses.referencing_part(found.id)?;
            let pending = uses.iter().filter(|u| u.is_pending()).count();
            print!(
                "{}",
                format_part_details(&found, uses.len(), pending, symbol)
            );
        }

        PartCommands::Edit {
            part,
            name,
            sku,
            brand,
            cost,
            notes,
        } => {
            let mut found = resolve_part(storage, &part)?;
            let before = found.clone();

            if let Some(name) = name {
                found.name = name;
            }
            if let Some(sku) = sku {
                found.sku = sku;
            }
            if let Some(brand) = brand {
                found.brand = Some(brand).filter(|b| !b.trim().is_empty());
            }
            if let Some(cost) = cost {
                found.cost = parse_money(&cost, "cost")?;
            }
            if let Some(notes) = notes {
                found.notes = notes;
            }

            if found == before {
                println!("No changes specified. Run 'trax part edit --help' for options.");
                return Ok(());
            }

            let updated = service.update(found)?;
            println!("Updated part: {} ({})", updated.name, updated.sku);
        }

        PartCommands::Restock { part, qty } => {
            let found = resolve_part(storage, &part)?;
            let updated = InventoryService::new(storage).restock(found.id, qty)?;
            println!(
                "Restocked {}: {} on hand",
                updated.sku, updated.qty_on_hand
            );

            let waiting = storage
                .part_uses
                .referencing_part(updated.id)?
                .into_iter()
                .filter(|u| u.is_pending())
                .count();
            if waiting > 0 {
                println!(
                    "  {} earlier use(s) were recorded without stock; stock was not deducted for them.",
                    waiting
                );
            }
        }

        PartCommands::Delete { part } => {
            let found = resolve_part(storage, &part)?;
            let (deleted, detached) = service.delete(found.id)?;
            println!("Deleted part: {} ({})", deleted.name, deleted.sku);
            if detached > 0 {
                println!("  {} part use(s) no longer linked to a part", detached);
            }
        }
    }

    Ok(())
}
