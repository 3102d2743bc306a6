//! Part service
//!
//! Parts catalog management. SKUs are the natural key and must be unique.

use tracing::info;

use crate::error::{TraxError, TraxResult};
use crate::models::{Money, Part, PartId};
use crate::storage::Storage;

/// Fields for a new part
#[derive(Debug, Clone, Default)]
pub struct NewPart {
    pub name: String,
    pub sku: String,
    pub brand: Option<String>,
    pub qty_on_hand: u32,
    pub cost: Money,
    pub notes: String,
}

/// Service for part management
pub struct PartService<'a> {
    storage: &'a Storage,
}

impl<'a> PartService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new part
    pub fn create(&self, input: NewPart) -> TraxResult<Part> {
        let mut part = Part::new(input.name.trim(), input.sku.trim())
            .with_stock(input.qty_on_hand, input.cost);
        part.brand = input
            .brand
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty());
        part.notes = input.notes;

        part.validate()
            .map_err(|e| TraxError::Validation(e.to_string()))?;

        if self.storage.parts.sku_exists(&part.sku, None)? {
            return Err(TraxError::Duplicate {
                entity_type: "Part",
                identifier: part.sku,
            });
        }

        self.storage.transaction(|s| s.parts.upsert(part.clone()))?;

        info!(sku = %part.sku, qty = part.qty_on_hand, "created part");
        Ok(part)
    }

    pub fn get(&self, id: PartId) -> TraxResult<Option<Part>> {
        self.storage.parts.get(id)
    }

    pub fn get_by_sku(&self, sku: &str) -> TraxResult<Option<Part>> {
        self.storage.parts.get_by_sku(sku.trim())
    }

    /// Find a part by SKU, full id or short id
    pub fn find(&self, identifier: &str) -> TraxResult<Option<Part>> {
        if let Some(part) = self.get_by_sku(identifier)? {
            return Ok(Some(part));
        }

        if let Ok(id) = identifier.parse::<PartId>() {
            return self.storage.parts.get(id);
        }

        let mut matches = self.storage.parts.find_where(|p| p.id.matches(identifier))?;
        Ok(if matches.len() == 1 { matches.pop() } else { None })
    }

    pub fn list(&self) -> TraxResult<Vec<Part>> {
        self.storage.parts.get_all()
    }

    /// Parts whose name or SKU contains the text (case-insensitive)
    pub fn search(&self, text: &str) -> TraxResult<Vec<Part>> {
        self.storage.parts.find_where(|p| p.matches_search(text))
    }

    /// Save edits to a part
    pub fn update(&self, mut part: Part) -> TraxResult<Part> {
        if !self.storage.parts.exists(part.id)? {
            return Err(TraxError::part_not_found(part.id.to_string()));
        }

        part.name = part.name.trim().to_string();
        part.sku = part.sku.trim().to_string();
        part.validate()
            .map_err(|e| TraxError::Validation(e.to_string()))?;

        if self.storage.parts.sku_exists(&part.sku, Some(part.id))? {
            return Err(TraxError::Duplicate {
                entity_type: "Part",
                identifier: part.sku,
            });
        }

        self.storage.transaction(|s| s.parts.upsert(part.clone()))?;
        Ok(part)
    }

    /// Delete a part; uses that referenced it keep their history without a part
    pub fn delete(&self, id: PartId) -> TraxResult<(Part, usize)> {
        let (part, detached) = self.storage.transaction(|s| s.delete_part(id))?;
        info!(sku = %part.sku, detached_uses = detached, "deleted part");
        Ok((part, detached))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TraxPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TraxPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn new_part(name: &str, sku: &str) -> NewPart {
        NewPart {
            name: name.into(),
            sku: sku.into(),
            qty_on_hand: 5,
            cost: Money::from_cents(250),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_part() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PartService::new(&storage);

        let part = service.create(new_part(" Capacitor kit ", " CAP-100 ")).unwrap();
        assert_eq!(part.name, "Capacitor kit");
        assert_eq!(part.sku, "CAP-100");
        assert_eq!(part.qty_on_hand, 5);
    }

    #[test]
    fn test_create_requires_name_and_sku() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PartService::new(&storage);

        assert!(service.create(new_part("", "CAP-100")).unwrap_err().is_validation());
        assert!(service.create(new_part("Kit", "  ")).unwrap_err().is_validation());
        assert_eq!(storage.parts.count().unwrap(), 0);
    }

    #[test]
    fn test_duplicate_sku_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PartService::new(&storage);

        service.create(new_part("Capacitor kit", "CAP-100")).unwrap();
        let err = service.create(new_part("Other kit", "CAP-100")).unwrap_err();
        assert!(matches!(err, TraxError::Duplicate { .. }));
        assert_eq!(storage.parts.count().unwrap(), 1);
    }

    #[test]
    fn test_update_checks_sku_against_others() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PartService::new(&storage);

        let mut a = service.create(new_part("A", "SKU-A")).unwrap();
        service.create(new_part("B", "SKU-B")).unwrap();

        a.notes = "restocked".into();
        assert!(service.update(a.clone()).is_ok());

        a.sku = "SKU-B".into();
        assert!(matches!(
            service.update(a).unwrap_err(),
            TraxError::Duplicate { .. }
        ));
    }

    #[test]
    fn test_find_and_search() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PartService::new(&storage);

        let part = service.create(new_part("Thermal Pad", "TP-2MM")).unwrap();
        service.create(new_part("Fan", "FAN-1")).unwrap();

        assert_eq!(service.find("TP-2MM").unwrap().unwrap().id, part.id);
        assert_eq!(service.find(&part.id.short()).unwrap().unwrap().id, part.id);
        assert_eq!(service.search("thermal").unwrap().len(), 1);
        assert_eq!(service.search("").unwrap().len(), 2);
    }

    #[test]
    fn test_delete_missing() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PartService::new(&storage);
        assert!(service.delete(PartId::new()).unwrap_err().is_not_found());
    }
}
