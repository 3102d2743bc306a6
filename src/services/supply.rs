//! Supply service

use tracing::info;

use crate::error::{TraxError, TraxResult};
use crate::models::{Supply, SupplyId};
use crate::storage::Storage;

/// Service for shop supplies
pub struct SupplyService<'a> {
    storage: &'a Storage,
}

impl<'a> SupplyService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new supply
    pub fn create(&self, mut supply: Supply) -> TraxResult<Supply> {
        normalize(&mut supply)?;
        self.storage.transaction(|s| s.supplies.upsert(supply.clone()))?;
        info!(supply = %supply.name, qty = supply.qty_on_hand, "created supply");
        Ok(supply)
    }

    pub fn get(&self, id: SupplyId) -> TraxResult<Option<Supply>> {
        self.storage.supplies.get(id)
    }

    /// Find a supply by name or id
    pub fn find(&self, identifier: &str) -> TraxResult<Option<Supply>> {
        if let Some(supply) = self.storage.supplies.get_by_name(identifier)? {
            return Ok(Some(supply));
        }

        if let Ok(id) = identifier.parse::<SupplyId>() {
            return self.storage.supplies.get(id);
        }

        let mut matches = self
            .storage
            .supplies
            .find_where(|s| s.id.matches(identifier))?;
        Ok(if matches.len() == 1 { matches.pop() } else { None })
    }

    pub fn list(&self) -> TraxResult<Vec<Supply>> {
        self.storage.supplies.get_all()
    }

    pub fn search(&self, text: &str) -> TraxResult<Vec<Supply>> {
        self.storage.supplies.find_where(|s| s.matches_search(text))
    }

    /// Supplies at or below their reorder threshold
    pub fn needs_reorder(&self) -> TraxResult<Vec<Supply>> {
        self.storage.supplies.find_where(Supply::needs_reorder)
    }

    pub fn update(&self, mut supply: Supply) -> TraxResult<Supply> {
        if self.storage.supplies.get(supply.id)?.is_none() {
            return Err(TraxError::supply_not_found(supply.id.to_string()));
        }
        normalize(&mut supply)?;
        self.storage.transaction(|s| s.supplies.upsert(supply.clone()))?;
        Ok(supply)
    }

    /// Add (positive) or consume (negative) stock
    pub fn adjust_quantity(&self, id: SupplyId, delta: i64) -> TraxResult<Supply> {
        let mut supply = self
            .get(id)?
            .ok_or_else(|| TraxError::supply_not_found(id.to_string()))?;

        let new_qty = i64::from(supply.qty_on_hand) + delta;
        if new_qty < 0 {
            return Err(TraxError::InsufficientStock {
                item: supply.name,
                needed: delta.unsigned_abs().min(u32::MAX as u64) as u32,
                available: supply.qty_on_hand,
            });
        }
        supply.qty_on_hand = u32::try_from(new_qty).map_err(|_| {
            TraxError::Validation(format!("Quantity for '{}' would overflow", supply.name))
        })?;

        self.storage.transaction(|s| s.supplies.upsert(supply.clone()))?;
        Ok(supply)
    }

    pub fn delete(&self, id: SupplyId) -> TraxResult<Supply> {
        let supply = self
            .get(id)?
            .ok_or_else(|| TraxError::supply_not_found(id.to_string()))?;
        self.storage.transaction(|s| {
            s.supplies.delete(id)?;
            Ok(())
        })?;
        Ok(supply)
    }
}

fn normalize(supply: &mut Supply) -> TraxResult<()> {
    supply.name = supply.name.trim().to_string();
    if supply.name.is_empty() {
        return Err(TraxError::Validation("Supply name cannot be empty".into()));
    }
    if supply.cost_per_unit.is_negative() {
        return Err(TraxError::Validation("Supply cost cannot be negative".into()));
    }
    supply.sku = supply
        .sku
        .take()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    supply.purchase_url = supply
        .purchase_url
        .take()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    Ok(())
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

    #[test]
    fn test_create_and_find() {
        let (_temp_dir, storage) = create_test_storage();
        let service = SupplyService::new(&storage);

        let mut flux = Supply::new("  Flux ");
        flux.sku = Some("".into());
        let flux = service.create(flux).unwrap();
        assert_eq!(flux.name, "Flux");
        assert_eq!(flux.sku, None);
        assert_eq!(service.find("flux").unwrap().unwrap().id, flux.id);

        assert!(service.create(Supply::new(" ")).unwrap_err().is_validation());
    }

    #[test]
    fn test_adjust_quantity() {
        let (_temp_dir, storage) = create_test_storage();
        let service = SupplyService::new(&storage);

        let mut ipa = Supply::new("Isopropyl");
        ipa.qty_on_hand = 3;
        let ipa = service.create(ipa).unwrap();

        assert_eq!(service.adjust_quantity(ipa.id, 2).unwrap().qty_on_hand, 5);
        assert_eq!(service.adjust_quantity(ipa.id, -5).unwrap().qty_on_hand, 0);

        let err = service.adjust_quantity(ipa.id, -1).unwrap_err();
        assert!(matches!(err, TraxError::InsufficientStock { .. }));
        assert_eq!(service.get(ipa.id).unwrap().unwrap().qty_on_hand, 0);
    }

    #[test]
    fn test_needs_reorder() {
        let (_temp_dir, storage) = create_test_storage();
        let service = SupplyService::new(&storage);

        let mut wrap = Supply::new("Bubble wrap");
        wrap.qty_on_hand = 1;
        wrap.reorder_threshold = 1;
        service.create(wrap).unwrap();

        let mut tape = Supply::new("Tape");
        tape.qty_on_hand = 9;
        tape.reorder_threshold = 2;
        service.create(tape).unwrap();

        let low = service.needs_reorder().unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].name, "Bubble wrap");
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let service = SupplyService::new(&storage);
        let flux = service.create(Supply::new("Flux")).unwrap();

        service.delete(flux.id).unwrap();
        assert!(service.list().unwrap().is_empty());
        assert!(service.delete(flux.id).unwrap_err().is_not_found());
    }
}
