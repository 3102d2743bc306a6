//! Configuration module for Console Trax
//!
//! This module provides configuration management including:
//! - Platform path resolution
//! - Settings persistence

pub mod paths;
pub mod settings;

pub use paths::TraxPaths;
pub use settings::Settings;
