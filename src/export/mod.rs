//! Export module for Console Trax
//!
//! Marketplace listing CSV. Full-store snapshots live in `backup`.

pub mod csv;

pub use self::csv::{export_units_csv, export_units_csv_file, write_listing_csv, LISTING_HEADERS};
