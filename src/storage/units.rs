//! Unit repository
//!
//! In-memory map of units, persisted as part of the store document.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::TraxError;
use crate::models::{Unit, UnitId};

/// Repository for units
pub struct UnitRepository {
    data: RwLock<HashMap<UnitId, Unit>>,
}

impl UnitRepository {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Replace all units
    pub fn replace_all(&self, units: Vec<Unit>) -> Result<(), TraxError> {
        let mut data = self.data.write().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for unit in units {
            data.insert(unit.id, unit);
        }
        Ok(())
    }

    /// Get a unit by ID
    pub fn get(&self, id: UnitId) -> Result<Option<Unit>, TraxError> {
        let data = self.data.read().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Get all units, oldest check-in first
    pub fn get_all(&self) -> Result<Vec<Unit>, TraxError> {
        let data = self.data.read().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut units: Vec<_> = data.values().cloned().collect();
        units.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(units)
    }

    /// Get units matching a predicate
    pub fn find_where<F>(&self, predicate: F) -> Result<Vec<Unit>, TraxError>
    where
        F: Fn(&Unit) -> bool,
    {
        Ok(self.get_all()?.into_iter().filter(|u| predicate(u)).collect())
    }

    /// Get a unit by title (case-insensitive)
    pub fn get_by_title(&self, title: &str) -> Result<Option<Unit>, TraxError> {
        let data = self.data.read().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let title = title.trim();
        Ok(data
            .values()
            .find(|u| u.title.eq_ignore_ascii_case(title))
            .cloned())
    }

    /// Insert or update a unit
    pub fn upsert(&self, unit: Unit) -> Result<(), TraxError> {
        let mut data = self.data.write().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(unit.id, unit);
        Ok(())
    }

    /// Apply a mutation to a stored unit. Returns false if it doesn't exist.
    pub fn modify<F>(&self, id: UnitId, f: F) -> Result<bool, TraxError>
    where
        F: FnOnce(&mut Unit),
    {
        let mut data = self.data.write().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        match data.get_mut(&id) {
            Some(unit) => {
                f(unit);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn delete(&self, id: UnitId) -> Result<bool, TraxError> {
        let mut data = self.data.write().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id).is_some())
    }

    pub fn exists(&self, id: UnitId) -> Result<bool, TraxError> {
        let data = self.data.read().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.contains_key(&id))
    }

    pub fn count(&self) -> Result<usize, TraxError> {
        let data = self.data.read().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}

impl Default for UnitRepository {
    fn default() -> Self {
        Self::new()
    }
}
