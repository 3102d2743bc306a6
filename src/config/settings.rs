//! User settings for Console Trax
//!
//! Process-wide key/value state: labor rate, backup reminder, last backup
//! time and the "last worked on" breadcrumb. Loaded once at startup and
//! saved whenever a value changes.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::paths::TraxPaths;
use crate::error::TraxError;
use crate::models::{Money, UnitId};

/// How long after the last backup the reminder starts nagging
pub const BACKUP_REMINDER_INTERVAL_HOURS: i64 = 24;

/// User settings for Console Trax
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version of the settings file
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Hourly labor rate used for labor cost estimates
    #[serde(default = "default_hourly_rate")]
    pub hourly_rate: Money,

    /// Whether to remind about stale backups
    #[serde(default = "default_backup_reminder")]
    pub backup_reminder_enabled: bool,

    /// When the last backup package was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_backup_at: Option<DateTime<Utc>>,

    /// The unit most recently worked on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_worked_on_unit: Option<UnitId>,

    /// Description of the most recent action (e.g. "Started timer")
    #[serde(default)]
    pub last_action_text: String,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_hourly_rate() -> Money {
    Money::from_dollars_cents(12, 0)
}

fn default_backup_reminder() -> bool {
    true
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            hourly_rate: default_hourly_rate(),
            backup_reminder_enabled: default_backup_reminder(),
            last_backup_at: None,
            last_worked_on_unit: None,
            last_action_text: String::new(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &TraxPaths) -> Result<Self, TraxError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| TraxError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                TraxError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TraxPaths) -> Result<(), TraxError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TraxError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| TraxError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Record a completed backup and persist
    pub fn record_backup(&mut self, at: DateTime<Utc>, paths: &TraxPaths) -> Result<(), TraxError> {
        self.last_backup_at = Some(at);
        self.save(paths)
    }

    /// Record the unit last worked on and what was done, then persist
    pub fn record_activity(
        &mut self,
        unit_id: UnitId,
        action: impl Into<String>,
        paths: &TraxPaths,
    ) -> Result<(), TraxError> {
        self.last_worked_on_unit = Some(unit_id);
        self.last_action_text = action.into();
        self.save(paths)
    }

    /// Whether a backup reminder should be shown at `now`
    pub fn backup_due(&self, now: DateTime<Utc>) -> bool {
        if !self.backup_reminder_enabled {
            return false;
        }
        match self.last_backup_at {
            Some(last) => now - last > Duration::hours(BACKUP_REMINDER_INTERVAL_HOURS),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.hourly_rate.cents(), 1200);
        assert!(settings.backup_reminder_enabled);
        assert!(settings.last_backup_at.is_none());
        assert!(settings.last_action_text.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TraxPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.hourly_rate = Money::from_cents(2550);
        settings.backup_reminder_enabled = false;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.hourly_rate.cents(), 2550);
        assert!(!loaded.backup_reminder_enabled);
    }

    #[test]
    fn test_record_activity_persists() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TraxPaths::with_base_dir(temp_dir.path().to_path_buf());
        let unit_id = UnitId::new();

        let mut settings = Settings::default();
        settings
            .record_activity(unit_id, "Started timer", &paths)
            .unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.last_worked_on_unit, Some(unit_id));
        assert_eq!(loaded.last_action_text, "Started timer");
    }

    #[test]
    fn test_backup_due() {
        let now = Utc::now();
        let mut settings = Settings::default();
        assert!(settings.backup_due(now));

        settings.last_backup_at = Some(now - Duration::hours(2));
        assert!(!settings.backup_due(now));

        settings.last_backup_at = Some(now - Duration::hours(25));
        assert!(settings.backup_due(now));

        settings.backup_reminder_enabled = false;
        assert!(!settings.backup_due(now));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.currency_symbol, "$");
        assert!(settings.backup_reminder_enabled);
    }
}
