//! Backup restoration for Console Trax
//!
//! Restore is destructive: the live store is replaced by the package. The
//! package is fully decoded and checked first, so a bad file leaves the
//! store as it was. Photo payloads are staged and only moved over the live
//! files after the new store commits.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::{TraxError, TraxResult};
use crate::models::{Part, PartId, Supply};
use crate::storage::{Storage, StoreDocument};

use super::package::{BackupPackage, PACKAGE_SCHEMA_VERSION};

/// Handles restoring from backups
pub struct RestoreManager<'a> {
    storage: &'a Storage,
}

impl<'a> RestoreManager<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Replace all current data with a backup file's contents
    pub fn restore_from_file(&self, backup_path: &Path) -> TraxResult<RestoreResult> {
        let package = read_package(backup_path)?;
        self.restore_from_package(package)
    }

    /// Replace all current data with a parsed package
    pub fn restore_from_package(&self, package: BackupPackage) -> TraxResult<RestoreResult> {
        check_schema(&package)?;

        let photo_files = self.storage.photo_files();
        let mut payloads = Vec::new();
        for console in &package.consoles {
            for photo in &console.photos {
                photo_files.path_for(&photo.file_name)?;
                let bytes = STANDARD.decode(&photo.base64_jpeg).map_err(|e| {
                    TraxError::Validation(format!(
                        "Photo '{}' has an invalid payload: {}",
                        photo.file_name, e
                    ))
                })?;
                payloads.push((photo.file_name.clone(), bytes));
            }
        }

        let mut result = RestoreResult {
            schema_version: package.schema_version,
            backup_date: package.generated_at,
            ..Default::default()
        };
        let doc = build_document(package, &mut result);

        photo_files.discard_staged()?;
        for (filename, bytes) in &payloads {
            if let Err(e) = photo_files.stage(filename, bytes) {
                let _ = photo_files.discard_staged();
                return Err(e);
            }
        }

        let committed = self.storage.transaction(|s| {
            s.wipe_all()?;
            s.install(doc)
        });
        if let Err(e) = committed {
            if let Err(cleanup) = photo_files.discard_staged() {
                warn!(error = %cleanup, "could not clear staged photos");
            }
            return Err(e);
        }

        let promoted = photo_files.promote_staged()?;

        info!(
            units = result.units,
            photo_files = promoted,
            parts = result.parts,
            supplies = result.supplies,
            unresolved_uses = result.unresolved_uses,
            "restored backup"
        );
        Ok(result)
    }

    /// Validate a backup file without restoring it
    pub fn validate_backup(&self, backup_path: &Path) -> TraxResult<ValidationResult> {
        let package = read_package(backup_path)?;

        let mut empty_photos = 0;
        let mut invalid_photos = 0;
        for photo in package.consoles.iter().flat_map(|c| &c.photos) {
            if photo.base64_jpeg.is_empty() {
                empty_photos += 1;
            } else if STANDARD.decode(&photo.base64_jpeg).is_err() {
                invalid_photos += 1;
            }
        }

        Ok(ValidationResult {
            is_valid: package.schema_version == PACKAGE_SCHEMA_VERSION && invalid_photos == 0,
            schema_version: package.schema_version,
            backup_date: package.generated_at,
            units: package.consoles.len(),
            parts: package.parts.len(),
            supplies: package.supplies.len(),
            photos: package.consoles.iter().map(|c| c.photos.len()).sum(),
            empty_photos,
            invalid_photos,
        })
    }
}

fn read_package(backup_path: &Path) -> TraxResult<BackupPackage> {
    let contents = fs::read_to_string(backup_path)
        .map_err(|e| TraxError::Io(format!("Failed to read backup file: {}", e)))?;

    serde_json::from_str(&contents)
        .map_err(|e| TraxError::Json(format!("Failed to parse backup file: {}", e)))
}

fn check_schema(package: &BackupPackage) -> TraxResult<()> {
    if package.schema_version != PACKAGE_SCHEMA_VERSION {
        return Err(TraxError::Validation(format!(
            "Unsupported backup schema version {} (expected {})",
            package.schema_version, PACKAGE_SCHEMA_VERSION
        )));
    }
    Ok(())
}

/// Turn a package into store contents, rebinding part uses by SKU
fn build_document(package: BackupPackage, result: &mut RestoreResult) -> StoreDocument {
    let mut doc = StoreDocument::empty();

    doc.parts = package.parts.into_iter().map(Part::from).collect();
    doc.supplies = package.supplies.into_iter().map(Supply::from).collect();

    let mut parts_by_sku: HashMap<&str, PartId> = HashMap::new();
    for part in &doc.parts {
        if parts_by_sku.contains_key(part.sku.as_str()) {
            warn!(sku = %part.sku, "duplicate SKU in backup; uses bind to the first part");
            if !result.duplicate_skus.contains(&part.sku) {
                result.duplicate_skus.push(part.sku.clone());
            }
        } else {
            parts_by_sku.insert(part.sku.as_str(), part.id);
        }
    }

    for console in &package.consoles {
        let unit_id = console.id;
        doc.units.push(console.to_unit());
        doc.tasks
            .extend(console.tasks.iter().map(|t| t.to_task(unit_id)));
        doc.time_entries
            .extend(console.time_entries.iter().map(|t| t.to_entry(unit_id)));
        doc.photos
            .extend(console.photos.iter().map(|p| p.to_photo(unit_id)));

        for record in &console.part_uses {
            let part_id = parts_by_sku.get(record.part_sku.as_str()).copied();
            if part_id.is_none() && !record.part_sku.is_empty() {
                warn!(sku = %record.part_sku, "no part with this SKU; use restored without a part");
                result.unresolved_uses += 1;
            }
            doc.part_uses.push(record.to_use(unit_id, part_id));
        }
    }

    result.units = doc.units.len();
    result.tasks = doc.tasks.len();
    result.photos = doc.photos.len();
    result.time_entries = doc.time_entries.len();
    result.part_uses = doc.part_uses.len();
    result.parts = doc.parts.len();
    result.supplies = doc.supplies.len();

    doc
}

/// Result of a restore operation
#[derive(Debug, Default)]
pub struct RestoreResult {
    /// Schema version of the restored backup
    pub schema_version: u32,
    /// When the backup was generated
    pub backup_date: DateTime<Utc>,
    pub units: usize,
    pub tasks: usize,
    pub photos: usize,
    pub time_entries: usize,
    pub part_uses: usize,
    pub parts: usize,
    pub supplies: usize,
    /// Uses whose SKU matched no part in the package
    pub unresolved_uses: usize,
    /// SKUs carried by more than one part in the package
    pub duplicate_skus: Vec<String>,
}

impl RestoreResult {
    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Restored {} units ({} tasks, {} photos, {} time entries, {} part uses), {} parts, {} supplies",
            self.units,
            self.tasks,
            self.photos,
            self.time_entries,
            self.part_uses,
            self.parts,
            self.supplies
        );
        if self.unresolved_uses > 0 {
            summary.push_str(&format!(
                "; {} part uses had no matching part",
                self.unresolved_uses
            ));
        }
        if !self.duplicate_skus.is_empty() {
            summary.push_str(&format!(
                "; duplicate SKUs: {}",
                self.duplicate_skus.join(", ")
            ));
        }
        summary
    }
}

/// Result of validating a backup
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether the backup can be restored
    pub is_valid: bool,
    /// Schema version of the backup
    pub schema_version: u32,
    /// When the backup was generated
    pub backup_date: DateTime<Utc>,
    pub units: usize,
    pub parts: usize,
    pub supplies: usize,
    pub photos: usize,
    /// Photos exported without bytes (their file was missing)
    pub empty_photos: usize,
    /// Photos whose payload is not valid base64
    pub invalid_photos: usize,
}

impl ValidationResult {
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} units, {} parts, {} supplies, {} photos",
            self.units, self.parts, self.supplies, self.photos
        );
        if self.empty_photos > 0 {
            summary.push_str(&format!(" ({} without image data)", self.empty_photos));
        }
        if self.schema_version != PACKAGE_SCHEMA_VERSION {
            summary.push_str(&format!(
                "; unsupported schema version {}",
                self.schema_version
            ));
        }
        if self.invalid_photos > 0 {
            summary.push_str(&format!("; {} invalid photo payloads", self.invalid_photos));
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::manager::{build_package, BackupManager};
    use crate::config::paths::TraxPaths;
    use crate::config::settings::Settings;
    use crate::models::{Money, Unit, UnitKind};
    use crate::services::{
        CheckIn, InventoryService, NewPart, PartService, TimeTrackerService, UnitService,
    };
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TraxPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn populate(storage: &Storage) {
        let units = UnitService::new(storage);
        let unit = units
            .check_in(CheckIn {
                title: "XBX-101".into(),
                price_paid: Some(Money::from_cents(3500)),
                tags: vec!["jasper".into()],
                ..Default::default()
            })
            .unwrap();
        units.add_task(unit.id, "Reflow GPU", None).unwrap();
        units.add_photo(unit.id, &[0xFF, 0xD8, 0x00, 0x7F], "front").unwrap();

        let part = PartService::new(storage)
            .create(NewPart {
                name: "Capacitor kit".into(),
                sku: "CAP-100".into(),
                qty_on_hand: 5,
                cost: Money::from_cents(250),
                ..Default::default()
            })
            .unwrap();
        InventoryService::new(storage)
            .attach(part.id, unit.id, 3, "C7B2")
            .unwrap();

        let tracker = TimeTrackerService::new(storage);
        tracker.start(unit.id).unwrap();
        tracker.stop(unit.id).unwrap();

        let mut flux = Supply::new("Flux");
        flux.qty_on_hand = 2;
        storage.supplies.upsert(flux).unwrap();
        storage.commit().unwrap();
    }

    #[test]
    fn test_round_trip_reproduces_store() {
        let (_temp, storage) = create_test_storage();
        populate(&storage);

        let before = storage.snapshot().unwrap();
        let photo_name = before.photos[0].filename.clone();

        let path = storage.paths().backup_dir().join("rt.json");
        let package = build_package(&storage, Utc::now()).unwrap();
        fs::write(&path, serde_json::to_string(&package).unwrap()).unwrap();

        // Disturb the live store and photo file before restoring
        storage.wipe_all().unwrap();
        storage.photo_files().remove(&photo_name).unwrap();

        let result = RestoreManager::new(&storage).restore_from_file(&path).unwrap();
        assert_eq!(result.units, 1);
        assert_eq!(result.unresolved_uses, 0);

        assert_eq!(storage.snapshot().unwrap(), before);
        assert_eq!(
            storage.photo_files().read(&photo_name).unwrap(),
            vec![0xFF, 0xD8, 0x00, 0x7F]
        );
    }

    #[test]
    fn test_round_trip_through_manager() {
        let (temp, storage) = create_test_storage();
        populate(&storage);
        let before = storage.snapshot().unwrap();

        let paths = TraxPaths::with_base_dir(temp.path().to_path_buf());
        let path = BackupManager::new(paths)
            .create_backup(&storage, &mut Settings::default())
            .unwrap();

        RestoreManager::new(&storage).restore_from_file(&path).unwrap();
        assert_eq!(storage.snapshot().unwrap(), before);
    }

    #[test]
    fn test_restore_missing_photo_creates_empty_file() {
        let (_temp, storage) = create_test_storage();
        populate(&storage);
        let photo_name = storage.photos.get_all().unwrap()[0].filename.clone();
        storage.photo_files().remove(&photo_name).unwrap();

        let package = build_package(&storage, Utc::now()).unwrap();
        assert_eq!(package.consoles[0].photos[0].base64_jpeg, "");

        RestoreManager::new(&storage)
            .restore_from_package(package)
            .unwrap();
        let path = storage.photo_files().path_for(&photo_name).unwrap();
        assert_eq!(fs::metadata(path).unwrap().len(), 0);
    }

    #[test]
    fn test_unmatched_sku_keeps_quantity_and_cost() {
        let (_temp, storage) = create_test_storage();
        populate(&storage);

        let mut package = build_package(&storage, Utc::now()).unwrap();
        package.consoles[0].part_uses[0].part_sku = "GHOST-1".into();
        let use_id = package.consoles[0].part_uses[0].id;

        let result = RestoreManager::new(&storage)
            .restore_from_package(package)
            .unwrap();
        assert_eq!(result.unresolved_uses, 1);

        let restored = storage.part_uses.get(use_id).unwrap().unwrap();
        assert_eq!(restored.part_id, None);
        assert_eq!(restored.use_qty, 3);
        assert_eq!(restored.cost_snapshot, Money::from_cents(250));
    }

    #[test]
    fn test_duplicate_skus_bind_to_first() {
        let (_temp, storage) = create_test_storage();
        populate(&storage);

        let mut package = build_package(&storage, Utc::now()).unwrap();
        let first_id = package.parts[0].id;
        let mut twin = package.parts[0].clone();
        twin.id = PartId::new();
        package.parts.push(twin);

        let result = RestoreManager::new(&storage)
            .restore_from_package(package)
            .unwrap();
        assert_eq!(result.duplicate_skus, vec!["CAP-100"]);
        assert_eq!(
            storage.part_uses.get_all().unwrap()[0].part_id,
            Some(first_id)
        );
        assert!(result.summary().contains("duplicate SKUs: CAP-100"));
    }

    #[test]
    fn test_malformed_json_leaves_store_untouched() {
        let (_temp, storage) = create_test_storage();
        populate(&storage);
        let before = storage.snapshot().unwrap();

        let path = storage.paths().backup_dir().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let err = RestoreManager::new(&storage).restore_from_file(&path).unwrap_err();
        assert!(matches!(err, TraxError::Json(_)));
        assert_eq!(storage.snapshot().unwrap(), before);
    }

    #[test]
    fn test_schema_mismatch_leaves_store_untouched() {
        let (_temp, storage) = create_test_storage();
        populate(&storage);
        let before = storage.snapshot().unwrap();

        let mut package = build_package(&storage, Utc::now()).unwrap();
        package.schema_version = 2;
        package.consoles.clear();

        let err = RestoreManager::new(&storage)
            .restore_from_package(package)
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(storage.snapshot().unwrap(), before);
    }

    #[test]
    fn test_invalid_base64_leaves_store_untouched() {
        let (_temp, storage) = create_test_storage();
        populate(&storage);
        let before = storage.snapshot().unwrap();

        let mut package = build_package(&storage, Utc::now()).unwrap();
        package.consoles[0].photos[0].base64_jpeg = "***".into();

        assert!(RestoreManager::new(&storage)
            .restore_from_package(package)
            .unwrap_err()
            .is_validation());
        assert_eq!(storage.snapshot().unwrap(), before);
    }

    #[test]
    fn test_failed_commit_keeps_live_photos() {
        let (_temp, storage) = create_test_storage();
        populate(&storage);
        let before = storage.snapshot().unwrap();
        let photo_name = before.photos[0].filename.clone();

        let mut package = build_package(&storage, Utc::now()).unwrap();
        package.consoles[0].photos[0].base64_jpeg = STANDARD.encode([9, 9, 9]);

        let store_file = storage.paths().store_file();
        fs::remove_file(&store_file).unwrap();
        fs::create_dir_all(&store_file).unwrap();

        assert!(RestoreManager::new(&storage)
            .restore_from_package(package)
            .is_err());
        assert_eq!(storage.snapshot().unwrap(), before);
        assert_eq!(
            storage.photo_files().read(&photo_name).unwrap(),
            vec![0xFF, 0xD8, 0x00, 0x7F]
        );
        assert!(!storage.photo_files().has_staged());
    }

    #[test]
    fn test_photo_placement_failure_is_backup_error() {
        let (_temp, storage) = create_test_storage();
        populate(&storage);
        let photo_name = storage.photos.get_all().unwrap()[0].filename.clone();
        let package = build_package(&storage, Utc::now()).unwrap();

        // A non-empty directory under the photo's name cannot be replaced
        let live = storage.photo_files().path_for(&photo_name).unwrap();
        fs::remove_file(&live).unwrap();
        fs::create_dir_all(live.join("blocker")).unwrap();

        let err = RestoreManager::new(&storage)
            .restore_from_package(package)
            .unwrap_err();
        assert!(matches!(err, TraxError::Backup(_)));
    }

    #[test]
    fn test_restore_replaces_existing_data() {
        let (_temp, storage) = create_test_storage();
        let package = build_package(&storage, Utc::now()).unwrap();

        storage
            .units
            .upsert(Unit::new("EXTRA", UnitKind::Console, Utc::now()))
            .unwrap();

        let result = RestoreManager::new(&storage)
            .restore_from_package(package)
            .unwrap();
        assert_eq!(result.units, 0);
        assert_eq!(storage.units.count().unwrap(), 0);
    }

    #[test]
    fn test_validate_backup() {
        let (_temp, storage) = create_test_storage();
        populate(&storage);

        let path = storage.paths().backup_dir().join("check.json");
        let package = build_package(&storage, Utc::now()).unwrap();
        fs::write(&path, serde_json::to_string(&package).unwrap()).unwrap();

        let validation = RestoreManager::new(&storage).validate_backup(&path).unwrap();
        assert!(validation.is_valid);
        assert_eq!(validation.units, 1);
        assert_eq!(validation.photos, 1);
        assert_eq!(validation.schema_version, 1);
    }
}
