//! Backup package format
//!
//! A package is one JSON document: every unit with its tasks, photos (bytes
//! inlined as base64), time entries and part uses, plus the parts and
//! supplies inventories. Part uses name their part by SKU rather than id so
//! a package can be restored into a store whose part ids differ.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    Money, Part, PartId, PartUse, PartUseId, Photo, PhotoId, PhysicalGrade, SaleInfo, Supply,
    SupplyId, Task, TaskId, TimeEntry, TimeEntryId, Triage, Unit, UnitId, UnitKind, UnitStatus,
};

/// The only package layout this version reads and writes
pub const PACKAGE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupPackage {
    pub schema_version: u32,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub consoles: Vec<ConsoleRecord>,
    #[serde(default)]
    pub parts: Vec<PartRecord>,
    #[serde(default)]
    pub supplies: Vec<SupplyRecord>,
}

impl BackupPackage {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            schema_version: PACKAGE_SCHEMA_VERSION,
            generated_at,
            consoles: Vec::new(),
            parts: Vec::new(),
            supplies: Vec::new(),
        }
    }
}

/// A unit and everything it owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleRecord {
    pub id: UnitId,
    pub title: String,
    pub kind: UnitKind,
    pub status: UnitStatus,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub manufacture_date: Option<NaiveDate>,
    #[serde(default)]
    pub physical_grade: PhysicalGrade,
    #[serde(default)]
    pub triage: Triage,
    #[serde(default)]
    pub purchase_source: Option<String>,
    #[serde(default)]
    pub price_paid: Option<Money>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub asking_price: Option<Money>,
    #[serde(default)]
    pub min_price: Option<Money>,
    #[serde(default)]
    pub sold_price: Option<Money>,
    #[serde(default)]
    pub sold_date: Option<NaiveDate>,
    #[serde(default)]
    pub buyer: Option<String>,
    #[serde(default)]
    pub marketplace: Option<String>,
    #[serde(default)]
    pub shipping_cost: Option<Money>,
    #[serde(default)]
    pub selling_fees: Option<Money>,
    #[serde(default)]
    pub selling_notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: String,
    pub last_activity_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
    #[serde(default)]
    pub photos: Vec<PhotoRecord>,
    #[serde(default)]
    pub time_entries: Vec<TimeRecord>,
    #[serde(default)]
    pub part_uses: Vec<UseRecord>,
}

impl ConsoleRecord {
    /// Unit fields only; children are filled in by the caller
    pub fn from_unit(unit: &Unit) -> Self {
        Self {
            id: unit.id,
            title: unit.title.clone(),
            kind: unit.kind,
            status: unit.status,
            serial_number: unit.serial_number.clone(),
            manufacture_date: unit.manufacture_date,
            physical_grade: unit.physical_grade,
            triage: unit.triage,
            purchase_source: unit.purchase_source.clone(),
            price_paid: unit.price_paid,
            start_date: unit.start_date,
            asking_price: unit.sale.asking_price,
            min_price: unit.sale.min_price,
            sold_price: unit.sale.sold_price,
            sold_date: unit.sale.sold_date,
            buyer: unit.sale.buyer.clone(),
            marketplace: unit.sale.marketplace.clone(),
            shipping_cost: unit.sale.shipping_cost,
            selling_fees: unit.sale.fees,
            selling_notes: unit.sale.notes.clone(),
            tags: unit.tags.clone(),
            notes: unit.notes.clone(),
            last_activity_at: unit.last_activity_at,
            created_at: unit.created_at,
            tasks: Vec::new(),
            photos: Vec::new(),
            time_entries: Vec::new(),
            part_uses: Vec::new(),
        }
    }

    pub fn to_unit(&self) -> Unit {
        Unit {
            id: self.id,
            title: self.title.clone(),
            kind: self.kind,
            status: self.status,
            serial_number: self.serial_number.clone(),
            manufacture_date: self.manufacture_date,
            physical_grade: self.physical_grade,
            triage: self.triage,
            purchase_source: self.purchase_source.clone(),
            price_paid: self.price_paid,
            start_date: self.start_date,
            sale: SaleInfo {
                asking_price: self.asking_price,
                min_price: self.min_price,
                sold_price: self.sold_price,
                sold_date: self.sold_date,
                buyer: self.buyer.clone(),
                marketplace: self.marketplace.clone(),
                shipping_cost: self.shipping_cost,
                fees: self.selling_fees,
                notes: self.selling_notes.clone(),
            },
            tags: self.tags.clone(),
            notes: self.notes.clone(),
            last_activity_at: self.last_activity_at,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub is_done: bool,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            is_done: task.is_done,
            order: task.order,
            due_date: task.due_date,
        }
    }
}

impl TaskRecord {
    pub fn to_task(&self, unit_id: UnitId) -> Task {
        Task {
            id: self.id,
            unit_id,
            title: self.title.clone(),
            is_done: self.is_done,
            order: self.order,
            due_date: self.due_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    pub id: PhotoId,
    pub file_name: String,
    #[serde(default)]
    pub caption: String,
    pub created_at: DateTime<Utc>,
    /// Standard-alphabet base64 of the image file; empty when the file was missing
    #[serde(rename = "base64JPEG", default)]
    pub base64_jpeg: String,
}

impl PhotoRecord {
    pub fn from_photo(photo: &Photo, base64_jpeg: String) -> Self {
        Self {
            id: photo.id,
            file_name: photo.filename.clone(),
            caption: photo.caption.clone(),
            created_at: photo.created_at,
            base64_jpeg,
        }
    }

    pub fn to_photo(&self, unit_id: UnitId) -> Photo {
        Photo {
            id: self.id,
            unit_id,
            filename: self.file_name.clone(),
            caption: self.caption.clone(),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRecord {
    pub id: TimeEntryId,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub note: String,
}

impl From<&TimeEntry> for TimeRecord {
    fn from(entry: &TimeEntry) -> Self {
        Self {
            id: entry.id,
            start: entry.start,
            end: entry.end,
            note: entry.note.clone(),
        }
    }
}

impl TimeRecord {
    pub fn to_entry(&self, unit_id: UnitId) -> TimeEntry {
        TimeEntry {
            id: self.id,
            unit_id,
            start: self.start,
            end: self.end,
            note: self.note.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseRecord {
    pub id: PartUseId,
    /// SKU of the used part; empty when the use had no part
    #[serde(rename = "partSKU", default)]
    pub part_sku: String,
    pub use_qty: u32,
    pub cost_snapshot: Money,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub stock_decremented: bool,
}

impl UseRecord {
    pub fn from_use(part_use: &PartUse, part_sku: String) -> Self {
        Self {
            id: part_use.id,
            part_sku,
            use_qty: part_use.use_qty,
            cost_snapshot: part_use.cost_snapshot,
            notes: part_use.notes.clone(),
            created_at: part_use.created_at,
            stock_decremented: part_use.stock_decremented,
        }
    }

    pub fn to_use(&self, unit_id: UnitId, part_id: Option<PartId>) -> PartUse {
        PartUse {
            id: self.id,
            unit_id,
            part_id,
            use_qty: self.use_qty,
            cost_snapshot: self.cost_snapshot,
            stock_decremented: self.stock_decremented,
            notes: self.notes.clone(),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartRecord {
    pub id: PartId,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    pub sku: String,
    pub qty_on_hand: u32,
    pub cost: Money,
    #[serde(default)]
    pub notes: String,
}

impl From<&Part> for PartRecord {
    fn from(part: &Part) -> Self {
        Self {
            id: part.id,
            name: part.name.clone(),
            brand: part.brand.clone(),
            sku: part.sku.clone(),
            qty_on_hand: part.qty_on_hand,
            cost: part.cost,
            notes: part.notes.clone(),
        }
    }
}

impl From<PartRecord> for Part {
    fn from(record: PartRecord) -> Self {
        Part {
            id: record.id,
            name: record.name,
            brand: record.brand,
            sku: record.sku,
            qty_on_hand: record.qty_on_hand,
            cost: record.cost,
            notes: record.notes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyRecord {
    pub id: SupplyId,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub qty_on_hand: u32,
    pub cost_per_unit: Money,
    #[serde(default)]
    pub reorder_threshold: u32,
    #[serde(rename = "purchaseURL", default)]
    pub purchase_url: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl From<&Supply> for SupplyRecord {
    fn from(supply: &Supply) -> Self {
        Self {
            id: supply.id,
            name: supply.name.clone(),
            sku: supply.sku.clone(),
            qty_on_hand: supply.qty_on_hand,
            cost_per_unit: supply.cost_per_unit,
            reorder_threshold: supply.reorder_threshold,
            purchase_url: supply.purchase_url.clone(),
            notes: supply.notes.clone(),
        }
    }
}

impl From<SupplyRecord> for Supply {
    fn from(record: SupplyRecord) -> Self {
        Supply {
            id: record.id,
            name: record.name,
            sku: record.sku,
            qty_on_hand: record.qty_on_hand,
            cost_per_unit: record.cost_per_unit,
            reorder_threshold: record.reorder_threshold,
            purchase_url: record.purchase_url,
            notes: record.notes,
        }
    }
}
