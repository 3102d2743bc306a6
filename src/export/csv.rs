//! CSV Export functionality
//!
//! Marketplace listing export: one row per unit, in the column layout
//! listing tools expect.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::error::{TraxError, TraxResult};
use crate::models::{Money, Unit};
use crate::storage::Storage;

/// Column headers of the listing CSV
pub const LISTING_HEADERS: [&str; 11] = [
    "SKU",
    "Title",
    "ConditionDescription",
    "Price",
    "Quantity",
    "Marketplace",
    "Buyer",
    "SoldDate",
    "ShippingCost",
    "Fees",
    "Notes",
];

/// Export all units as a listing CSV
pub fn export_units_csv<W: Write>(storage: &Storage, writer: W) -> TraxResult<usize> {
    let units = storage.units.get_all()?;
    write_listing_csv(&units, writer)?;
    Ok(units.len())
}

/// Export all units as a listing CSV file
pub fn export_units_csv_file(storage: &Storage, path: &Path) -> TraxResult<usize> {
    let file = File::create(path)
        .map_err(|e| TraxError::Export(format!("Failed to create {}: {}", path.display(), e)))?;
    let count = export_units_csv(storage, file)?;
    info!(units = count, path = %path.display(), "exported listing CSV");
    Ok(count)
}

/// Write the given units as listing rows
pub fn write_listing_csv<W: Write>(units: &[Unit], writer: W) -> TraxResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(LISTING_HEADERS)
        .map_err(|e| TraxError::Export(e.to_string()))?;

    for unit in units {
        csv_writer
            .write_record(listing_row(unit))
            .map_err(|e| TraxError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| TraxError::Export(e.to_string()))?;
    Ok(())
}

fn listing_row(unit: &Unit) -> [String; 11] {
    let sale = &unit.sale;
    [
        unit.title.clone(),
        unit.title.clone(),
        unit.physical_grade.to_string(),
        amount(sale.effective_price()),
        "1".to_string(),
        sale.marketplace.clone().unwrap_or_default(),
        sale.buyer.clone().unwrap_or_default(),
        sale.sold_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        amount(sale.shipping_cost),
        amount(sale.fees),
        sale.notes.clone().unwrap_or_default(),
    ]
}

fn amount(money: Option<Money>) -> String {
    money.map(|m| m.to_plain_string()).unwrap_or_default()
}
