//! Display formatting for terminal output
//!
//! Provides utilities for formatting units and inventory for terminal
//! display as aligned tables and detail views.

pub mod part;
pub mod unit;

pub use part::{format_part_details, format_part_list, format_supply_list};
pub use unit::{format_unit_details, format_unit_list, UseLine};
