//! Console Trax - inventory and repair tracker for console refurbishment
//!
//! This library provides the core functionality for tracking refurbishment
//! units from check-in to sale: repair checklists, photos, labor time, parts
//! consumed from inventory, and snapshot backups.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (units, parts, supplies, etc.)
//! - `storage`: Single-document JSON store with transactional commit
//! - `services`: Business logic layer
//! - `backup`: Snapshot backup and destructive restore
//! - `export`: Marketplace listing CSV
//! - `cli` / `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use console_trax::config::paths::TraxPaths;
//! use console_trax::services::{CheckIn, UnitService};
//! use console_trax::storage::Storage;
//!
//! let storage = Storage::new(TraxPaths::new()?)?;
//! storage.load_all()?;
//! let unit = UnitService::new(&storage).check_in(CheckIn {
//!     title: "XBX-101".into(),
//!     ..Default::default()
//! })?;
//! ```

pub mod backup;
pub mod cli;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::TraxError;
