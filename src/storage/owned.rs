//! Repository for records owned by a unit
//!
//! Tasks, photos, time entries and part uses share the same shape: keyed by
//! their own id, grouped by the owning unit, and deleted with it.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::RwLock;

use crate::error::TraxError;
use crate::models::{
    PartId, PartUse, PartUseId, Photo, PhotoId, Task, TaskId, TimeEntry, TimeEntryId, UnitId,
};

/// A record that belongs to exactly one unit
pub trait UnitOwned: Clone {
    type Id: Copy + Eq + Hash + Ord + fmt::Display;

    /// Entity name used in error messages
    const ENTITY: &'static str;

    fn id(&self) -> Self::Id;

    fn unit_id(&self) -> UnitId;

    /// Ordering of records within one unit
    fn cmp_within_unit(&self, other: &Self) -> Ordering;
}

impl UnitOwned for Task {
    type Id = TaskId;
    const ENTITY: &'static str = "Task";

    fn id(&self) -> TaskId {
        self.id
    }

    fn unit_id(&self) -> UnitId {
        self.unit_id
    }

    fn cmp_within_unit(&self, other: &Self) -> Ordering {
        self.order.cmp(&other.order).then_with(|| self.id.cmp(&other.id))
    }
}

impl UnitOwned for Photo {
    type Id = PhotoId;
    const ENTITY: &'static str = "Photo";

    fn id(&self) -> PhotoId {
        self.id
    }

    fn unit_id(&self) -> UnitId {
        self.unit_id
    }

    fn cmp_within_unit(&self, other: &Self) -> Ordering {
        self.created_at
            .cmp(&other.created_at)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl UnitOwned for TimeEntry {
    type Id = TimeEntryId;
    const ENTITY: &'static str = "Time entry";

    fn id(&self) -> TimeEntryId {
        self.id
    }

    fn unit_id(&self) -> UnitId {
        self.unit_id
    }

    fn cmp_within_unit(&self, other: &Self) -> Ordering {
        self.start.cmp(&other.start).then_with(|| self.id.cmp(&other.id))
    }
}

impl UnitOwned for PartUse {
    type Id = PartUseId;
    const ENTITY: &'static str = "Part use";

    fn id(&self) -> PartUseId {
        self.id
    }

    fn unit_id(&self) -> UnitId {
        self.unit_id
    }

    fn cmp_within_unit(&self, other: &Self) -> Ordering {
        self.created_at
            .cmp(&other.created_at)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Repository for one kind of unit-owned record
pub struct OwnedRepository<T: UnitOwned> {
    data: RwLock<HashMap<T::Id, T>>,
}

impl<T: UnitOwned> OwnedRepository<T> {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn replace_all(&self, records: Vec<T>) -> Result<(), TraxError> {
        let mut data = self.data.write().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for record in records {
            data.insert(record.id(), record);
        }
        Ok(())
    }

    pub fn get(&self, id: T::Id) -> Result<Option<T>, TraxError> {
        let data = self.data.read().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Get a record or fail with a NotFound error
    pub fn require(&self, id: T::Id) -> Result<T, TraxError> {
        self.get(id)?.ok_or_else(|| TraxError::NotFound {
            entity_type: T::ENTITY,
            identifier: id.to_string(),
        })
    }

    /// All records, grouped by unit and ordered within each unit
    pub fn get_all(&self) -> Result<Vec<T>, TraxError> {
        let data = self.data.read().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut records: Vec<_> = data.values().cloned().collect();
        records.sort_by(|a, b| {
            a.unit_id()
                .cmp(&b.unit_id())
                .then_with(|| a.cmp_within_unit(b))
        });
        Ok(records)
    }

    /// Records owned by a unit, in display order
    pub fn for_unit(&self, unit_id: UnitId) -> Result<Vec<T>, TraxError> {
        let data = self.data.read().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut records: Vec<_> = data
            .values()
            .filter(|r| r.unit_id() == unit_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.cmp_within_unit(b));
        Ok(records)
    }

    pub fn find_where<F>(&self, predicate: F) -> Result<Vec<T>, TraxError>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.get_all()?.into_iter().filter(|r| predicate(r)).collect())
    }

    pub fn upsert(&self, record: T) -> Result<(), TraxError> {
        let mut data = self.data.write().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(record.id(), record);
        Ok(())
    }

    /// Apply a mutation to a stored record. Returns false if it doesn't exist.
    pub fn modify<F>(&self, id: T::Id, f: F) -> Result<bool, TraxError>
    where
        F: FnOnce(&mut T),
    {
        let mut data = self.data.write().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        match data.get_mut(&id) {
            Some(record) => {
                f(record);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Apply a mutation to every record matching a predicate. Returns how many changed.
    pub fn modify_where<P, F>(&self, predicate: P, mut f: F) -> Result<usize, TraxError>
    where
        P: Fn(&T) -> bool,
        F: FnMut(&mut T),
    {
        let mut data = self.data.write().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let mut changed = 0;
        for record in data.values_mut().filter(|r| predicate(r)) {
            f(record);
            changed += 1;
        }
        Ok(changed)
    }

    pub fn delete(&self, id: T::Id) -> Result<Option<T>, TraxError> {
        let mut data = self.data.write().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id))
    }

    /// Remove every record owned by a unit, returning what was removed
    pub fn delete_for_unit(&self, unit_id: UnitId) -> Result<Vec<T>, TraxError> {
        let mut data = self.data.write().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let ids: Vec<T::Id> = data
            .values()
            .filter(|r| r.unit_id() == unit_id)
            .map(|r| r.id())
            .collect();

        let mut removed: Vec<T> = ids.into_iter().filter_map(|id| data.remove(&id)).collect();
        removed.sort_by(|a, b| a.cmp_within_unit(b));
        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, TraxError> {
        let data = self.data.read().map_err(|e| {
            TraxError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}

impl OwnedRepository<PartUse> {
    /// Uses that reference a given part
    pub fn referencing_part(&self, part_id: PartId) -> Result<Vec<PartUse>, TraxError> {
        self.find_where(|u| u.part_id == Some(part_id))
    }
}

impl<T: UnitOwned> Default for OwnedRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_unit_orders_tasks() {
        let repo: OwnedRepository<Task> = OwnedRepository::new();
        let unit_a = UnitId::new();
        let unit_b = UnitId::new();

        repo.upsert(Task::new(unit_a, "second", 1)).unwrap();
        repo.upsert(Task::new(unit_a, "first", 0)).unwrap();
        repo.upsert(Task::new(unit_b, "other", 0)).unwrap();

        let titles: Vec<_> = repo
            .for_unit(unit_a)
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[test]
    fn test_delete_for_unit_leaves_others() {
        let repo: OwnedRepository<Task> = OwnedRepository::new();
        let unit_a = UnitId::new();
        let unit_b = UnitId::new();

        repo.upsert(Task::new(unit_a, "a1", 0)).unwrap();
        repo.upsert(Task::new(unit_a, "a2", 1)).unwrap();
        repo.upsert(Task::new(unit_b, "b1", 0)).unwrap();

        let removed = repo.delete_for_unit(unit_a).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(repo.count().unwrap(), 1);
        assert!(repo.for_unit(unit_a).unwrap().is_empty());
    }

    #[test]
    fn test_require_missing_is_not_found() {
        let repo: OwnedRepository<Task> = OwnedRepository::new();
        let err = repo.require(TaskId::new()).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().starts_with("Task not found"));
    }

    #[test]
    fn test_modify_where() {
        let repo: OwnedRepository<Task> = OwnedRepository::new();
        let unit = UnitId::new();
        repo.upsert(Task::new(unit, "a", 0)).unwrap();
        repo.upsert(Task::new(unit, "b", 1)).unwrap();

        let changed = repo.modify_where(|t| t.order > 0, |t| t.is_done = true).unwrap();
        assert_eq!(changed, 1);
        let done: Vec<_> = repo.find_where(|t| t.is_done).unwrap();
        assert_eq!(done[0].title, "b");
    }
}
