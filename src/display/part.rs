//! Part and supply display formatting

use crate::models::{Part, Supply};

/// Format the parts inventory as a table
pub fn format_part_list(parts: &[Part], symbol: &str) -> String {
    if parts.is_empty() {
        return "No parts found.".to_string();
    }

    let name_width = parts.iter().map(|p| p.name.len()).max().unwrap_or(4).max(4);
    let sku_width = parts.iter().map(|p| p.sku.len()).max().unwrap_or(3).max(3);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<sku_width$}  {:>6}  {:>10}  {}\n",
        "Name",
        "SKU",
        "Stock",
        "Cost",
        "ID",
        name_width = name_width,
        sku_width = sku_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<sku_width$}  {:->6}  {:->10}  {:-<13}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
        sku_width = sku_width,
    ));

    for part in parts {
        output.push_str(&format!(
            "{:<name_width$}  {:<sku_width$}  {:>6}  {:>10}  {}\n",
            part.name,
            part.sku,
            part.qty_on_hand,
            part.cost.format_with_symbol(symbol),
            part.id,
            name_width = name_width,
            sku_width = sku_width,
        ));
    }

    output
}

/// Format a single part's details
pub fn format_part_details(part: &Part, use_count: usize, pending: usize, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Part: {}\n", part.name));
    output.push_str(&format!("  SKU:      {}\n", part.sku));
    if let Some(brand) = &part.brand {
        output.push_str(&format!("  Brand:    {}\n", brand));
    }
    output.push_str(&format!("  ID:       {}\n", part.id.to_uuid_string()));
    output.push_str(&format!("  In Stock: {}\n", part.qty_on_hand));
    output.push_str(&format!("  Cost:     {}\n", part.cost.format_with_symbol(symbol)));
    output.push_str(&format!("  Used on:  {} unit record(s)\n", use_count));
    if pending > 0 {
        output.push_str(&format!("  Pending:  {} use(s) waiting on stock\n", pending));
    }

    if !part.notes.is_empty() {
        output.push('\n');
        output.push_str(&format!("  Notes: {}\n", part.notes));
    }

    output
}

/// Format the supplies inventory as a table
pub fn format_supply_list(supplies: &[Supply], symbol: &str) -> String {
    if supplies.is_empty() {
        return "No supplies found.".to_string();
    }

    let name_width = supplies
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>6}  {:>7}  {:>10}  {:<7}  {}\n",
        "Name",
        "Stock",
        "Reorder",
        "Unit Cost",
        "Status",
        "ID",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->6}  {:->7}  {:->10}  {:-<7}  {:-<12}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for supply in supplies {
        output.push_str(&format!(
            "{:<name_width$}  {:>6}  {:>7}  {:>10}  {:<7}  {}\n",
            supply.name,
            supply.qty_on_hand,
            supply.reorder_threshold,
            supply.cost_per_unit.format_with_symbol(symbol),
            if supply.needs_reorder() { "REORDER" } else { "" },
            supply.id,
            name_width = name_width,
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_format_part_list() {
        let parts = vec![
            Part::new("Capacitor kit", "CAP-100").with_stock(5, Money::from_cents(250)),
            Part::new("Thermal paste", "TP-1"),
        ];
        let output = format_part_list(&parts, "$");

        assert!(output.contains("Capacitor kit"));
        assert!(output.contains("CAP-100"));
        assert!(output.contains("$2.50"));
        assert_eq!(output.lines().count(), 4);
    }

    #[test]
    fn test_format_part_details_pending() {
        let part = Part::new("Capacitor kit", "CAP-100");
        let output = format_part_details(&part, 2, 1, "$");
        assert!(output.contains("Used on:  2 unit record(s)"));
        assert!(output.contains("1 use(s) waiting on stock"));
    }

    #[test]
    fn test_format_supply_list_flags_reorder() {
        let mut flux = Supply::new("Flux");
        flux.qty_on_hand = 1;
        flux.reorder_threshold = 2;
        let mut wick = Supply::new("Solder wick");
        wick.qty_on_hand = 10;
        wick.reorder_threshold = 2;

        let output = format_supply_list(&[flux, wick], "$");
        let flux_line = output.lines().find(|l| l.starts_with("Flux")).unwrap();
        let wick_line = output.lines().find(|l| l.starts_with("Solder")).unwrap();
        assert!(flux_line.contains("REORDER"));
        assert!(!wick_line.contains("REORDER"));
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(format_part_list(&[], "$"), "No parts found.");
        assert_eq!(format_supply_list(&[], "$"), "No supplies found.");
    }
}
