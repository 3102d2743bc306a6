//! Custom error types for Console Trax
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for Console Trax operations
#[derive(Error, Debug)]
pub enum TraxError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Stock adjustment would take a quantity below zero
    #[error("Insufficient stock for '{item}': need {needed}, have {available}")]
    InsufficientStock {
        item: String,
        needed: u32,
        available: u32,
    },

    /// Restore failed while placing photo files
    #[error("Backup error: {0}")]
    Backup(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl TraxError {
    /// Create a "not found" error for units
    pub fn unit_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Unit",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for parts
    pub fn part_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Part",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for supplies
    pub fn supply_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Supply",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for tasks
    pub fn task_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Task",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for part uses
    pub fn part_use_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Part use",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for photos
    pub fn photo_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Photo",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for TraxError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TraxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Console Trax operations
pub type TraxResult<T> = Result<T, TraxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TraxError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = TraxError::part_not_found("CAP-100");
        assert_eq!(err.to_string(), "Part not found: CAP-100");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_insufficient_stock_error() {
        let err = TraxError::InsufficientStock {
            item: "Thermal paste".into(),
            needed: 5,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for 'Thermal paste': need 5, have 3"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let trax_err: TraxError = io_err.into();
        assert!(matches!(trax_err, TraxError::Io(_)));
    }
}
