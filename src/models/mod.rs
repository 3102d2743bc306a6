//! Core data models for Console Trax
//!
//! Units and their owned records (tasks, photos, time entries, part uses),
//! plus the independent parts and supplies inventories.

pub mod ids;
pub mod money;
pub mod part;
pub mod photo;
pub mod supply;
pub mod task;
pub mod time_entry;
pub mod unit;

pub use ids::{PartId, PartUseId, PhotoId, SupplyId, TaskId, TimeEntryId, UnitId};
pub use money::{Money, MoneyParseError};
pub use part::{Part, PartUse, PartValidationError};
pub use photo::Photo;
pub use supply::Supply;
pub use task::Task;
pub use time_entry::TimeEntry;
pub use unit::{
    PhysicalGrade, SaleInfo, Triage, TriageStatus, Unit, UnitKind, UnitStatus,
    UnitValidationError,
};
