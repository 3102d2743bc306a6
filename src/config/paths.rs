//! Path management for Console Trax
//!
//! Provides platform path resolution for configuration, data, photos and backups.
//!
//! ## Path Resolution Order
//!
//! 1. `TRAX_DATA_DIR` environment variable (if set)
//! 2. The platform config directory for `console-trax` (e.g. `~/.config/console-trax`)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::TraxError;

/// Manages all paths used by Console Trax
#[derive(Debug, Clone)]
pub struct TraxPaths {
    /// Base directory for all Console Trax data
    base_dir: PathBuf,
}

impl TraxPaths {
    /// Create a new TraxPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, TraxError> {
        let base_dir = if let Ok(custom) = std::env::var("TRAX_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create TraxPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (<base>/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the photo directory (<base>/photos/)
    pub fn photos_dir(&self) -> PathBuf {
        self.base_dir.join("photos")
    }

    /// Get the backup directory (<base>/backups/)
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the entity store document
    pub fn store_file(&self) -> PathBuf {
        self.data_dir().join("store.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), TraxError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| TraxError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| TraxError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.photos_dir())
            .map_err(|e| TraxError::Io(format!("Failed to create photo directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| TraxError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }

    /// Check if Console Trax has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, TraxError> {
    ProjectDirs::from("", "", "console-trax")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| TraxError::Config("Could not determine a home directory".into()))
}
