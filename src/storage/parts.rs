//! Part repository
//!
//! In-memory map of parts with SKU lookups. SKU uniqueness is a service-level
//! rule checked at creation; the repository itself accepts duplicates.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::TraxError;
use crate::models::{Part, PartId};

/// Repository for parts
pub struct PartRepository {
    data: RwLock<HashMap<PartId, Part>>,
}

impl PartRepository {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn replace_all(&self, parts: Vec<Part>) -> Result<(), TraxError> {
        let mut data = self.data.write().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for part in parts {
            data.insert(part.id, part);
        }
        Ok(())
    }

    pub fn get(&self, id: PartId) -> Result<Option<Part>, TraxError> {
        let data = self.data.read().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Get all parts sorted by name, then SKU
    pub fn get_all(&self) -> Result<Vec<Part>, TraxError> {
        let data = self.data.read().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut parts: Vec<_> = data.values().cloned().collect();
        parts.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.sku.cmp(&b.sku))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(parts)
    }

    pub fn find_where<F>(&self, predicate: F) -> Result<Vec<Part>, TraxError>
    where
        F: Fn(&Part) -> bool,
    {
        Ok(self.get_all()?.into_iter().filter(|p| predicate(p)).collect())
    }

    /// Get a part by exact SKU
    pub fn get_by_sku(&self, sku: &str) -> Result<Option<Part>, TraxError> {
        let data = self.data.read().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.values().find(|p| p.sku == sku).cloned())
    }

    /// Check if a SKU is already taken
    pub fn sku_exists(&self, sku: &str, exclude_id: Option<PartId>) -> Result<bool, TraxError> {
        let data = self.data.read().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data
            .values()
            .any(|p| p.sku == sku && Some(p.id) != exclude_id))
    }

    pub fn upsert(&self, part: Part) -> Result<(), TraxError> {
        let mut data = self.data.write().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(part.id, part);
        Ok(())
    }

    /// Apply a mutation to a stored part. Returns false if it doesn't exist.
    pub fn modify<F>(&self, id: PartId, f: F) -> Result<bool, TraxError>
    where
        F: FnOnce(&mut Part),
    {
        let mut data = self.data.write().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        match data.get_mut(&id) {
            Some(part) => {
                f(part);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn delete(&self, id: PartId) -> Result<bool, TraxError> {
        let mut data = self.data.write().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id).is_some())
    }

    pub fn exists(&self, id: PartId) -> Result<bool, TraxError> {
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

impl Default for PartRepository {
    fn default() -> Self {
        Self::new()
    }
}
