//! Storage initialization
//!
//! Handles first-run setup: directory layout, default settings and an empty
//! store document.

use crate::config::paths::TraxPaths;
use crate::config::settings::Settings;
use crate::error::TraxError;

use super::file_io::write_json_atomic;
use super::StoreDocument;

/// Initialize storage for a fresh installation
///
/// Existing settings and store files are left untouched.
pub fn initialize_storage(paths: &TraxPaths) -> Result<(), TraxError> {
    paths.ensure_directories()?;

    if !paths.store_file().exists() {
        write_json_atomic(paths.store_file(), &StoreDocument::empty())?;
    }

    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &TraxPaths) -> bool {
    !paths.settings_file().exists()
}
