//! Backup system for Console Trax
//!
//! Snapshot packages of the whole store, with photo bytes inlined, and
//! destructive restore from them.
//!
//! # Architecture
//!
//! - `BackupManager`: builds packages, writes and lists backup files
//! - `RestoreManager`: validates and restores packages
//!
//! # Backup Format
//!
//! One JSON document, camelCase keys, sorted:
//! - `schemaVersion`: always 1
//! - `generatedAt`: RFC 3339 timestamp
//! - `consoles`: units with embedded `tasks`, `photos` (`base64JPEG`),
//!   `timeEntries` and `partUses` (keyed by `partSKU`)
//! - `parts`, `supplies`
//!
//! Money fields are integer cents.
//!
//! # Example
//!
//! ```rust,ignore
//! use console_trax::backup::{BackupManager, RestoreManager};
//!
//! let manager = BackupManager::new(paths.clone());
//! let backup_path = manager.create_backup(&storage, &mut settings)?;
//!
//! let result = RestoreManager::new(&storage).restore_from_file(&backup_path)?;
//! println!("{}", result.summary());
//! ```

mod manager;
mod package;
mod restore;

pub use manager::{build_package, BackupInfo, BackupManager};
pub use package::{
    BackupPackage, ConsoleRecord, PartRecord, PhotoRecord, SupplyRecord, TaskRecord, TimeRecord,
    UseRecord, PACKAGE_SCHEMA_VERSION,
};
pub use restore::{RestoreManager, RestoreResult, ValidationResult};
