//! Supply CLI commands
//!
//! Shop consumables: stock counts and reorder thresholds.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::part::format_supply_list;
use crate::error::{TraxError, TraxResult};
use crate::models::{Money, Supply};
use crate::services::SupplyService;
use crate::storage::Storage;

use super::parse_money;

/// Supply subcommands
#[derive(Subcommand)]
pub enum SupplyCommands {
    /// Add a supply
    Add {
        /// Supply name
        name: String,
        #[arg(long)]
        sku: Option<String>,
        /// Quantity on hand
        #[arg(short, long, default_value = "0")]
        qty: u32,
        /// Cost per unit
        #[arg(short, long)]
        cost: Option<String>,
        /// Reorder when stock falls to this level
        #[arg(short, long, default_value = "0")]
        reorder_at: u32,
        /// Where to buy more
        #[arg(long)]
        url: Option<String>,
        #[arg(short, long, default_value = "")]
        notes: String,
    },
    /// List supplies
    List {
        /// Filter by name or SKU
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Change stock by a signed amount (e.g. -2)
    Adjust {
        /// Supply name or ID
        supply: String,
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Delete a supply
    Delete {
        /// Supply name or ID
        supply: String,
    },
    /// List supplies at or below their reorder threshold
    Reorder,
}

fn resolve_supply(service: &SupplyService<'_>, identifier: &str) -> TraxResult<Supply> {
    service
        .find(identifier)?
        .ok_or_else(|| TraxError::supply_not_found(identifier))
}

/// Handle a supply command
pub fn handle_supply_command(
    storage: &Storage,
    settings: &Settings,
    cmd: SupplyCommands,
) -> TraxResult<()> {
    let service = SupplyService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        SupplyCommands::Add {
            name,
            sku,
            qty,
            cost,
            reorder_at,
            url,
            notes,
        } => {
            let mut supply = Supply::new(name);
            supply.sku = sku;
            supply.qty_on_hand = qty;
            supply.cost_per_unit = match cost {
                Some(cost) => parse_money(&cost, "cost")?,
                None => Money::zero(),
            };
            supply.reorder_threshold = reorder_at;
            supply.purchase_url = url;
            supply.notes = notes;

            let created = service.create(supply)?;
            println!("Added supply: {}", created.name);
            println!("  In Stock: {}", created.qty_on_hand);
            println!("  ID:       {}", created.id);
        }

        SupplyCommands::List { search } => {
            let supplies = match search {
                Some(text) => service.search(&text)?,
                None => service.list()?,
            };
            print!("{}", format_supply_list(&supplies, symbol));
        }

        SupplyCommands::Adjust { supply, delta } => {
            let found = resolve_supply(&service, &supply)?;
            let updated = service.adjust_quantity(found.id, delta)?;
            println!("{}: {} on hand", updated.name, updated.qty_on_hand);
            if updated.needs_reorder() {
                println!("  At or below reorder threshold ({})", updated.reorder_threshold);
            }
        }

        SupplyCommands::Delete { supply } => {
            let found = resolve_supply(&service, &supply)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted supply: {}", deleted.name);
        }

        SupplyCommands::Reorder => {
            let low = service.needs_reorder()?;
            if low.is_empty() {
                println!("Nothing to reorder.");
                return Ok(());
            }
            print!("{}", format_supply_list(&low, symbol));
            for supply in &low {
                if let Some(url) = &supply.purchase_url {
                    println!("  {}: {}", supply.name, url);
                }
            }
        }
    }

    Ok(())
}
