//! Service layer for Console Trax
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, computed fields, and cross-entity operations.

pub mod inventory;
pub mod part;
pub mod supply;
pub mod time_tracker;
pub mod unit;

pub use inventory::{AttachResult, InventoryService, RemoveResult, UseOutcome};
pub use part::{NewPart, PartService};
pub use supply::SupplyService;
pub use time_tracker::{format_duration, TimeTrackerService, TimerTransition};
pub use unit::{CheckIn, UnitFilter, UnitService, UnitSort, UnitSummary};
