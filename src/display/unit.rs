//! Unit display formatting
//!
//! Formats units for terminal output in list and detail views.

use crate::models::{Money, Part, PartUse, Photo, Task};
use crate::services::{format_duration, UnitSummary};

/// Format a list of units with their cost summaries as a table
pub fn format_unit_list(summaries: &[UnitSummary], symbol: &str) -> String {
    if summaries.is_empty() {
        return "No units found.".to_string();
    }

    let title_width = summaries
        .iter()
        .map(|s| s.unit.title.len())
        .max()
        .unwrap_or(5)
        .max(5);

    let status_width = summaries
        .iter()
        .map(|s| s.unit.status.to_string().len())
        .max()
        .unwrap_or(6)
        .max(6);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<title_width$}  {:<10}  {:<status_width$}  {:>5}  {:>9}  {:>10}  {:>10}  {}\n",
        "Title",
        "Kind",
        "Status",
        "Tasks",
        "Labor",
        "Parts",
        "Profit",
        "ID",
        title_width = title_width,
        status_width = status_width,
    ));
    output.push_str(&format!(
        "{:-<title_width$}  {:-<10}  {:-<status_width$}  {:->5}  {:->9}  {:->10}  {:->10}  {:-<13}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        title_width = title_width,
        status_width = status_width,
    ));

    for summary in summaries {
        let unit = &summary.unit;
        let marker = if summary.timer_running { " *" } else { "" };
        let profit = summary
            .estimated_profit
            .map(|p| p.format_with_symbol(symbol))
            .unwrap_or_else(|| "-".to_string());

        output.push_str(&format!(
            "{:<title_width$}  {:<10}  {:<status_width$}  {:>5}  {:>9}  {:>10}  {:>10}  {}{}\n",
            unit.title,
            unit.kind.to_string(),
            unit.status.to_string(),
            format!("{}/{}", summary.total_tasks - summary.open_tasks, summary.total_tasks),
            format_duration(summary.labor),
            summary.parts_cost.format_with_symbol(symbol),
            profit,
            unit.id,
            marker,
            title_width = title_width,
            status_width = status_width,
        ));
    }

    if summaries.iter().any(|s| s.timer_running) {
        output.push_str("\n* timer running\n");
    }

    output
}

/// A part use paired with its part, when the part still exists
pub struct UseLine<'a> {
    pub part_use: &'a PartUse,
    pub part: Option<&'a Part>,
}

/// Format a single unit's details, checklist, photos and parts
pub fn format_unit_details(
    summary: &UnitSummary,
    tasks: &[Task],
    photos: &[Photo],
    uses: &[UseLine<'_>],
    symbol: &str,
) -> String {
    let unit = &summary.unit;
    let money = |m: Option<Money>| {
        m.map(|m| m.format_with_symbol(symbol))
            .unwrap_or_else(|| "-".to_string())
    };

    let mut output = String::new();

    output.push_str(&format!("Unit: {}\n", unit.title));
    output.push_str(&format!("  Kind:           {}\n", unit.kind));
    output.push_str(&format!("  Status:         {}\n", unit.status));
    output.push_str(&format!("  ID:             {}\n", unit.id.to_uuid_string()));
    if let Some(serial) = &unit.serial_number {
        output.push_str(&format!("  Serial:         {}\n", serial));
    }
    if let Some(date) = unit.manufacture_date {
        output.push_str(&format!("  Manufactured:   {}\n", date));
    }
    output.push_str(&format!("  Grade:          {}\n", unit.physical_grade));
    output.push_str(&format!(
        "  Triage:         power {}, AV {}, HDD {}, DVD {}\n",
        unit.triage.power, unit.triage.av, unit.triage.hdd, unit.triage.dvd
    ));
    if !unit.tags.is_empty() {
        output.push_str(&format!("  Tags:           {}\n", unit.tags.join(", ")));
    }

    output.push('\n');
    if let Some(source) = &unit.purchase_source {
        output.push_str(&format!("  Purchased from: {}\n", source));
    }
    output.push_str(&format!("  Price Paid:     {}\n", money(unit.price_paid)));
    output.push_str(&format!("  Parts Cost:     {}\n", summary.parts_cost.format_with_symbol(symbol)));
    output.push_str(&format!(
        "  Labor:          {} ({}){}\n",
        format_duration(summary.labor),
        summary.labor_cost.format_with_symbol(symbol),
        if summary.timer_running { " [running]" } else { "" }
    ));

    let sale = &unit.sale;
    if sale.asking_price.is_some() || sale.sold_price.is_some() {
        output.push('\n');
        output.push_str(&format!("  Asking Price:   {}\n", money(sale.asking_price)));
        if sale.min_price.is_some() {
            output.push_str(&format!("  Minimum Price:  {}\n", money(sale.min_price)));
        }
        if let Some(sold) = sale.sold_price {
            output.push_str(&format!("  Sold Price:     {}\n", sold.format_with_symbol(symbol)));
        }
        if let Some(date) = sale.sold_date {
            output.push_str(&format!("  Sold Date:      {}\n", date));
        }
        if let Some(buyer) = &sale.buyer {
            output.push_str(&format!("  Buyer:          {}\n", buyer));
        }
        if let Some(marketplace) = &sale.marketplace {
            output.push_str(&format!("  Marketplace:    {}\n", marketplace));
        }
        output.push_str(&format!("  Shipping:       {}\n", money(sale.shipping_cost)));
        output.push_str(&format!("  Fees:           {}\n", money(sale.fees)));
    }
    output.push_str(&format!("  Est. Profit:    {}\n", money(summary.estimated_profit)));

    output.push('\n');
    output.push_str(&format!(
        "Tasks ({}/{} done)\n",
        summary.total_tasks - summary.open_tasks,
        summary.total_tasks
    ));
    for task in tasks {
        let due = task
            .due_date
            .map(|d| format!(" (due {})", d))
            .unwrap_or_default();
        output.push_str(&format!(
            "  [{}] {}{}  {}\n",
            if task.is_done { "x" } else { " " },
            task.title,
            due,
            task.id
        ));
    }

    if !uses.is_empty() {
        output.push('\n');
        output.push_str("Parts Used\n");
        for line in uses {
            let name = line
                .part
                .map(|p| format!("{} ({})", p.name, p.sku))
                .unwrap_or_else(|| "(deleted part)".to_string());
            let pending = if line.part_use.is_pending() {
                " [pending stock]"
            } else {
                ""
            };
            output.push_str(&format!(
                "  {} x{} @ {} = {}{}  {}\n",
                name,
                line.part_use.use_qty,
                line.part_use.cost_snapshot.format_with_symbol(symbol),
                line.part_use.total_cost().format_with_symbol(symbol),
                pending,
                line.part_use.id
            ));
        }
    }

    if !photos.is_empty() {
        output.push('\n');
        output.push_str(&format!("Photos ({})\n", photos.len()));
        for photo in photos {
            output.push_str(&format!("  {}  {}  {}\n", photo.id, photo.filename, photo.caption));
        }
    }

    if !unit.notes.is_empty() {
        output.push('\n');
        output.push_str(&format!("  Notes: {}\n", unit.notes));
    }

    output.push('\n');
    output.push_str(&format!(
        "  Created:       {}\n",
        unit.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Last Activity: {}\n",
        unit.last_activity_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Unit, UnitKind};
    use chrono::{Duration, Utc};

    fn create_test_summary(title: &str, running: bool) -> UnitSummary {
        UnitSummary {
            unit: Unit::new(title, UnitKind::Console, Utc::now()),
            parts_cost: Money::from_cents(750),
            labor: Duration::minutes(65),
            labor_cost: Money::from_cents(1300),
            open_tasks: 1,
            total_tasks: 3,
            photo_count: 0,
            timer_running: running,
            estimated_profit: None,
        }
    }

    #[test]
    fn test_format_unit_list() {
        let summaries = vec![
            create_test_summary("XBX-101", true),
            create_test_summary("XBX-102", false),
        ];
        let output = format_unit_list(&summaries, "$");

        assert!(output.contains("XBX-101"));
        assert!(output.contains("XBX-102"));
        assert!(output.contains("2/3"));
        assert!(output.contains("1h 05m"));
        assert!(output.contains("$7.50"));
        assert!(output.contains("* timer running"));
    }

    #[test]
    fn test_format_empty_list() {
        assert_eq!(format_unit_list(&[], "$"), "No units found.");
    }

    #[test]
    fn test_format_unit_details() {
        let summary = create_test_summary("XBX-101", false);
        let unit_id = summary.unit.id;
        let tasks = vec![Task::new(unit_id, "Replace clock cap", 1)];
        let part_use = PartUse {
            id: Default::default(),
            unit_id,
            part_id: None,
            use_qty: 2,
            cost_snapshot: Money::from_cents(375),
            stock_decremented: false,
            notes: String::new(),
            created_at: Utc::now(),
        };
        let uses = vec![UseLine {
            part_use: &part_use,
            part: None,
        }];

        let output = format_unit_details(&summary, &tasks, &[], &uses, "$");
        assert!(output.contains("Unit: XBX-101"));
        assert!(output.contains("[ ] Replace clock cap"));
        assert!(output.contains("(deleted part) x2 @ $3.75 = $7.50 [pending stock]"));
        assert!(output.contains("Labor:          1h 05m ($13.00)"));
    }
}
