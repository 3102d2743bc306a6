//! Backup manager for Console Trax
//!
//! Writes snapshot packages of the whole store, photo bytes included, to
//! dated files in the backup directory.

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::paths::TraxPaths;
use crate::config::settings::Settings;
use crate::error::{TraxError, TraxResult};
use crate::storage::{write_json_atomic, Storage};

use super::package::{
    BackupPackage, ConsoleRecord, PartRecord, PhotoRecord, SupplyRecord, TaskRecord, TimeRecord,
    UseRecord,
};

const BACKUP_PREFIX: &str = "trax-backup-";

/// Metadata about a backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    /// Backup filename
    pub filename: String,
    /// Full path to backup
    pub path: PathBuf,
    /// When the backup was created
    pub created_at: DateTime<Utc>,
    /// Size in bytes
    pub size_bytes: u64,
}

/// Creates and lists backup packages
pub struct BackupManager {
    backup_dir: PathBuf,
    paths: TraxPaths,
}

impl BackupManager {
    pub fn new(paths: TraxPaths) -> Self {
        let backup_dir = paths.backup_dir();
        Self { backup_dir, paths }
    }

    /// Write a backup of the whole store and record it in settings
    ///
    /// Returns the path to the created backup file.
    pub fn create_backup(&self, storage: &Storage, settings: &mut Settings) -> TraxResult<PathBuf> {
        self.create_backup_at(storage, settings, Utc::now())
    }

    /// Write a backup stamped with the given time
    pub fn create_backup_at(
        &self,
        storage: &Storage,
        settings: &mut Settings,
        now: DateTime<Utc>,
    ) -> TraxResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            TraxError::Io(format!("Failed to create backup directory: {}", e))
        })?;

        let package = build_package(storage, now)?;

        // Going through a Value gives sorted object keys
        let value = serde_json::to_value(&package)
            .map_err(|e| TraxError::Json(format!("Failed to serialize backup: {}", e)))?;

        let filename = format!(
            "{}{}-{:03}.json",
            BACKUP_PREFIX,
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );
        let backup_path = self.backup_dir.join(&filename);
        write_json_atomic(&backup_path, &value)?;

        settings.record_backup(now, &self.paths)?;

        info!(
            file = %filename,
            units = package.consoles.len(),
            parts = package.parts.len(),
            supplies = package.supplies.len(),
            "created backup"
        );
        Ok(backup_path)
    }

    /// List all available backups, newest first
    pub fn list_backups(&self) -> TraxResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir).map_err(|e| {
            TraxError::Io(format!("Failed to read backup directory: {}", e))
        })? {
            let entry = entry.map_err(|e| {
                TraxError::Io(format!("Failed to read directory entry: {}", e))
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(info) = parse_backup_info(&path) {
                    backups.push(info);
                }
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(backups)
    }

    /// Get backup directory path
    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }

    /// Get a specific backup by filename
    pub fn get_backup(&self, filename: &str) -> TraxResult<Option<BackupInfo>> {
        let path = self.backup_dir.join(filename);
        if path.exists() {
            Ok(parse_backup_info(&path))
        } else {
            Ok(None)
        }
    }

    /// Get the most recent backup
    pub fn get_latest_backup(&self) -> TraxResult<Option<BackupInfo>> {
        let backups = self.list_backups()?;
        Ok(backups.into_iter().next())
    }
}

/// Assemble a package from the live store
pub fn build_package(storage: &Storage, now: DateTime<Utc>) -> TraxResult<BackupPackage> {
    let mut package = BackupPackage::new(now);

    let parts = storage.parts.get_all()?;
    package.parts = parts.iter().map(PartRecord::from).collect();
    package.supplies = storage
        .supplies
        .get_all()?
        .iter()
        .map(SupplyRecord::from)
        .collect();

    for unit in storage.units.get_all()? {
        let mut record = ConsoleRecord::from_unit(&unit);

        record.tasks = storage
            .tasks
            .for_unit(unit.id)?
            .iter()
            .map(TaskRecord::from)
            .collect();

        record.time_entries = storage
            .time_entries
            .for_unit(unit.id)?
            .iter()
            .map(TimeRecord::from)
            .collect();

        for photo in storage.photos.for_unit(unit.id)? {
            let payload = match storage.photo_files().read(&photo.filename) {
                Ok(bytes) => STANDARD.encode(bytes),
                Err(e) => {
                    warn!(file = %photo.filename, error = %e, "photo file unreadable; exporting empty payload");
                    String::new()
                }
            };
            record.photos.push(PhotoRecord::from_photo(&photo, payload));
        }

        for part_use in storage.part_uses.for_unit(unit.id)? {
            let sku = part_use
                .part_id
                .and_then(|id| parts.iter().find(|p| p.id == id))
                .map(|p| p.sku.clone())
                .unwrap_or_default();
            record.part_uses.push(UseRecord::from_use(&part_use, sku));
        }

        package.consoles.push(record);
    }

    Ok(package)
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();

    // trax-backup-YYYYMMDD-HHMMSS-mmm.json
    let date_part = filename.strip_prefix(BACKUP_PREFIX)?.strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(date_part)?;

    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
    })
}

/// Parse a backup timestamp from the filename date part
fn parse_backup_timestamp(date_str: &str) -> Option<DateTime<Utc>> {
    // Expected format: YYYYMMDD-HHMMSS or YYYYMMDD-HHMMSS-mmm (with milliseconds)
    let parts: Vec<&str> = date_str.split('-').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    let date_part = parts[0];
    let time_part = parts[1];
    let millis: u32 = if parts.len() == 3 {
        parts[2].parse().unwrap_or(0)
    } else {
        0
    };

    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }

    let year: i32 = date_part[0..4].parse().ok()?;
    let month: u32 = date_part[4..6].parse().ok()?;
    let day: u32 = date_part[6..8].parse().ok()?;
    let hour: u32 = time_part[0..2].parse().ok()?;
    let minute: u32 = time_part[2..4].parse().ok()?;
    let second: u32 = time_part[4..6].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = chrono::NaiveTime::from_hms_milli_opt(hour, minute, second, millis)?;
    let datetime = chrono::NaiveDateTime::new(date, time);

    Some(DateTime::from_naive_utc_and_offset(datetime, Utc))
}
