//! Supply repository

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::TraxError;
use crate::models::{Supply, SupplyId};

/// Repository for supplies
pub struct SupplyRepository {
    data: RwLock<HashMap<SupplyId, Supply>>,
}

impl SupplyRepository {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn replace_all(&self, supplies: Vec<Supply>) -> Result<(), TraxError> {
        let mut data = self.data.write().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for supply in supplies {
            data.insert(supply.id, supply);
        }
        Ok(())
    }

    pub fn get(&self, id: SupplyId) -> Result<Option<Supply>, TraxError> {
        let data = self.data.read().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Get all supplies sorted by name
    pub fn get_all(&self) -> Result<Vec<Supply>, TraxError> {
        let data = self.data.read().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut supplies: Vec<_> = data.values().cloned().collect();
        supplies.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(supplies)
    }

    pub fn find_where<F>(&self, predicate: F) -> Result<Vec<Supply>, TraxError>
    where
        F: Fn(&Supply) -> bool,
    {
        Ok(self.get_all()?.into_iter().filter(|s| predicate(s)).collect())
    }

    /// Get a supply by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Supply>, TraxError> {
        let data = self.data.read().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let name = name.trim();
        Ok(data
            .values()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    pub fn upsert(&self, supply: Supply) -> Result<(), TraxError> {
        let mut data = self.data.write().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(supply.id, supply);
        Ok(())
    }

    pub fn delete(&self, id: SupplyId) -> Result<bool, TraxError> {
        let mut data = self.data.write().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, TraxError> {
        let data = self.data.read().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}

impl Default for SupplyRepository {
    fn default() -> Self {
        Self::new()
    }
}
