//! Unit CLI commands
//!
//! Check-in, listing, editing and deletion of tracked units.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::unit::{format_unit_details, format_unit_list, UseLine};
use crate::error::{TraxError, TraxResult};
use crate::models::{PhysicalGrade, Triage, TriageStatus, UnitKind, UnitStatus};
use crate::services::{CheckIn, InventoryService, UnitFilter, UnitService, UnitSort};
use crate::storage::Storage;

use super::{parse_date, parse_money, resolve_unit};

/// Unit subcommands
#[derive(Subcommand)]
pub enum UnitCommands {
    /// Check in a new unit
    CheckIn {
        /// Unit number / label (e.g. "XBX-101")
        title: String,
        /// Kind (console, controller, accessory)
        #[arg(short, long, default_value = "console")]
        kind: String,
        /// Serial number
        #[arg(long)]
        serial: Option<String>,
        /// Manufacture date (YYYY-MM-DD)
        #[arg(long)]
        manufactured: Option<String>,
        /// Physical grade (excellent, good, fair, poor)
        #[arg(short, long, default_value = "good")]
        grade: String,
        /// Power triage (works, issues, dead)
        #[arg(long, default_value = "works")]
        power: String,
        /// Audio/video triage
        #[arg(long, default_value = "works")]
        av: String,
        /// Hard drive triage
        #[arg(long, default_value = "works")]
        hdd: String,
        /// DVD drive triage
        #[arg(long, default_value = "works")]
        dvd: String,
        /// Where the unit was bought
        #[arg(long)]
        source: Option<String>,
        /// Price paid (e.g. "35.00")
        #[arg(short, long)]
        paid: Option<String>,
        /// Start date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        started: Option<String>,
        /// Tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        /// Notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List units
    List {
        /// Only units with this status (repeatable)
        #[arg(short, long = "status")]
        statuses: Vec<String>,
        /// Search title, serial, tags and notes
        #[arg(long)]
        search: Option<String>,
        /// Only units with this tag
        #[arg(short, long)]
        tag: Option<String>,
        /// Sort by last activity instead of running timers first
        #[arg(long)]
        by_activity: bool,
    },
    /// Show unit details
    Show {
        /// Unit title or ID
        unit: String,
    },
    /// Edit a unit
    Edit {
        /// Unit title or ID
        unit: String,
        /// New unit number / label
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        serial: Option<String>,
        /// Physical grade
        #[arg(long)]
        grade: Option<String>,
        /// Purchase source
        #[arg(long)]
        source: Option<String>,
        /// Price paid
        #[arg(long)]
        paid: Option<String>,
        /// Asking price
        #[arg(long)]
        asking: Option<String>,
        /// Minimum acceptable price
        #[arg(long)]
        min_price: Option<String>,
        /// Final sale price
        #[arg(long)]
        sold_price: Option<String>,
        /// Sale date (YYYY-MM-DD)
        #[arg(long)]
        sold_date: Option<String>,
        #[arg(long)]
        buyer: Option<String>,
        #[arg(long)]
        marketplace: Option<String>,
        /// Shipping cost
        #[arg(long)]
        shipping: Option<String>,
        /// Selling fees
        #[arg(long)]
        fees: Option<String>,
        /// Listing / sale notes
        #[arg(long)]
        sale_notes: Option<String>,
        /// General notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Change a unit's workflow status
    Status {
        /// Unit title or ID
        unit: String,
        /// New status (in-progress, waiting-parts, completed, sold, parts-spares)
        status: String,
    },
    /// Add a tag to a unit
    Tag {
        /// Unit title or ID
        unit: String,
        tag: String,
    },
    /// Remove a tag from a unit
    Untag {
        /// Unit title or ID
        unit: String,
        tag: String,
    },
    /// Delete a unit and everything it owns
    Delete {
        /// Unit title or ID
        unit: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

fn parse_kind(input: &str) -> TraxResult<UnitKind> {
    UnitKind::parse(input).ok_or_else(|| {
        TraxError::Validation(format!(
            "Invalid kind: '{}'. Valid kinds: console, controller, accessory",
            input
        ))
    })
}

fn parse_grade(input: &str) -> TraxResult<PhysicalGrade> {
    PhysicalGrade::parse(input).ok_or_else(|| {
        TraxError::Validation(format!(
            "Invalid grade: '{}'. Valid grades: excellent, good, fair, poor",
            input
        ))
    })
}

fn parse_triage(input: &str) -> TraxResult<TriageStatus> {
    TriageStatus::parse(input).ok_or_else(|| {
        TraxError::Validation(format!(
            "Invalid triage state: '{}'. Valid states: works, has-issues, not-functioning",
            input
        ))
    })
}

pub(crate) fn parse_status(input: &str) -> TraxResult<UnitStatus> {
    UnitStatus::parse(input).ok_or_else(|| {
        TraxError::Validation(format!(
            "Invalid status: '{}'. Valid statuses: in-progress, waiting-parts, completed, sold, parts-spares",
            input
        ))
    })
}

fn optional_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Handle a unit command
pub fn handle_unit_command(
    storage: &Storage,
    settings: &Settings,
    cmd: UnitCommands,
) -> TraxResult<()> {
    let service = UnitService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        UnitCommands::CheckIn {
            title,
            kind,
            serial,
            manufactured,
            grade,
            power,
            av,
            hdd,
            dvd,
            source,
            paid,
            started,
            tags,
            notes,
        } => {
            let input = CheckIn {
                title,
                kind: parse_kind(&kind)?,
                serial_number: serial.and_then(optional_text),
                manufacture_date: manufactured.as_deref().map(parse_date).transpose()?,
                physical_grade: parse_grade(&grade)?,
                triage: Triage {
                    power: parse_triage(&power)?,
                    av: parse_triage(&av)?,
                    hdd: parse_triage(&hdd)?,
                    dvd: parse_triage(&dvd)?,
                },
                purchase_source: source.and_then(optional_text),
                price_paid: paid
                    .as_deref()
                    .map(|p| parse_money(p, "price paid"))
                    .transpose()?,
                start_date: started.as_deref().map(parse_date).transpose()?,
                tags,
                notes: notes.unwrap_or_default(),
            };

            let unit = service.check_in(input)?;
            println!("Checked in: {}", unit.title);
            println!("  Kind:  {}", unit.kind);
            println!("  Grade: {}", unit.physical_grade);
            if let Some(paid) = unit.price_paid {
                println!("  Paid:  {}", paid.format_with_symbol(symbol));
            }
            println!("  ID:    {}", unit.id.to_uuid_string());
        }

        UnitCommands::List {
            statuses,
            search,
            tag,
            by_activity,
        } => {
            let filter = UnitFilter {
                statuses: statuses
                    .iter()
                    .map(|s| parse_status(s))
                    .collect::<TraxResult<Vec<_>>>()?,
                search,
                tag,
                sort: if by_activity {
                    UnitSort::LastWorkedFirst
                } else {
                    UnitSort::RunningFirst
                },
            };

            let units = service.list(&filter)?;
            let summaries = units
                .iter()
                .map(|u| service.summary(u, settings.hourly_rate))
                .collect::<TraxResult<Vec<_>>>()?;
            print!("{}", format_unit_list(&summaries, symbol));

            if let Some(last_id) = settings.last_worked_on_unit {
                if let Some(last) = summaries.iter().map(|s| &s.unit).find(|u| u.id == last_id) {
                    println!();
                    println!("Last worked on: {} ({})", last.title, settings.last_action_text);
                }
            }
        }

        UnitCommands::Show { unit } => {
            let found = resolve_unit(storage, &unit)?;
            let summary = service.summary(&found, settings.hourly_rate)?;
            let tasks = service.tasks(found.id)?;
            let photos = service.photos(found.id)?;
            let uses = InventoryService::new(storage).uses_for_unit(found.id)?;
            let parts = storage.parts.get_all()?;

            let lines: Vec<UseLine<'_>> = uses
                .iter()
                .map(|u| UseLine {
                    part_use: u,
                    part: u
                        .part_id
                        .and_then(|id| parts.iter().find(|p| p.id == id)),
                })
                .collect();

            print!(
                "{}",
                format_unit_details(&summary, &tasks, &photos, &lines, symbol)
            );
        }

        UnitCommands::Edit {
            unit,
            title,
            serial,
            grade,
            source,
            paid,
            asking,
            min_price,
            sold_price,
            sold_date,
            buyer,
            marketplace,
            shipping,
            fees,
            sale_notes,
            notes,
        } => {
            let mut found = resolve_unit(storage, &unit)?;
            let before = found.clone();

            if let Some(title) = title {
                found.title = title;
            }
            if let Some(serial) = serial {
                found.serial_number = optional_text(serial);
            }
            if let Some(grade) = grade {
                found.physical_grade = parse_grade(&grade)?;
            }
            if let Some(source) = source {
                found.purchase_source = optional_text(source);
            }
            if let Some(paid) = paid {
                found.price_paid = Some(parse_money(&paid, "price paid")?);
            }
            if let Some(asking) = asking {
                found.sale.asking_price = Some(parse_money(&asking, "asking price")?);
            }
            if let Some(min_price) = min_price {
                found.sale.min_price = Some(parse_money(&min_price, "minimum price")?);
            }
            if let Some(sold_price) = sold_price {
                found.sale.sold_price = Some(parse_money(&sold_price, "sold price")?);
            }
            if let Some(sold_date) = sold_date {
                found.sale.sold_date = Some(parse_date(&sold_date)?);
            }
            if let Some(buyer) = buyer {
                found.sale.buyer = optional_text(buyer);
            }
            if let Some(marketplace) = marketplace {
                found.sale.marketplace = optional_text(marketplace);
            }
            if let Some(shipping) = shipping {
                found.sale.shipping_cost = Some(parse_money(&shipping, "shipping cost")?);
            }
            if let Some(fees) = fees {
                found.sale.fees = Some(parse_money(&fees, "fees")?);
            }
            if let Some(sale_notes) = sale_notes {
                found.sale.notes = optional_text(sale_notes);
            }
            if let Some(notes) = notes {
                found.notes = notes;
            }

            if found == before {
                println!("No changes specified. Run 'trax unit edit --help' for options.");
                return Ok(());
            }

            let updated = service.update(found)?;
            println!("Updated unit: {}", updated.title);
        }

        UnitCommands::Status { unit, status } => {
            let found = resolve_unit(storage, &unit)?;
            let updated = service.set_status(found.id, parse_status(&status)?)?;
            println!("{} is now {}", updated.title, updated.status);
        }

        UnitCommands::Tag { unit, tag } => {
            let found = resolve_unit(storage, &unit)?;
            if service.add_tag(found.id, &tag)? {
                println!("Tagged {} with '{}'", found.title, tag.trim());
            } else {
                println!("{} already has tag '{}'", found.title, tag.trim());
            }
        }

        UnitCommands::Untag { unit, tag } => {
            let found = resolve_unit(storage, &unit)?;
            if service.remove_tag(found.id, &tag)? {
                println!("Removed tag '{}' from {}", tag.trim(), found.title);
            } else {
                println!("{} has no tag '{}'", found.title, tag.trim());
            }
        }

        UnitCommands::Delete { unit, force } => {
            let found = resolve_unit(storage, &unit)?;

            if !force {
                println!("WARNING: This deletes {} with all of its tasks, photos,", found.title);
                println!("time entries and part uses. Used stock is not returned.");
                println!("To proceed, run again with --force flag:");
                println!("  trax unit delete {} --force", unit);
                return Ok(());
            }

            let removed = service.delete(found.id)?;
            println!("Deleted unit: {}", removed.unit.title);
            println!(
                "  Removed {} tasks, {} photos, {} time entries, {} part uses",
                removed.tasks.len(),
                removed.photos.len(),
                removed.time_entries.len(),
                removed.part_uses.len()
            );
        }
    }

    Ok(())
}
