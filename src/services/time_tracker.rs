//! Labor time tracking
//!
//! Each unit is either idle or has exactly one running time entry. Starting
//! a running unit or stopping an idle one changes nothing.

use chrono::Duration;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::config::paths::TraxPaths;
use crate::config::settings::Settings;
use crate::error::{TraxError, TraxResult};
use crate::models::{Money, TimeEntry, UnitId};
use crate::storage::Storage;

/// What a start/stop call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerTransition {
    Started(TimeEntry),
    /// A timer was already running; carries the open entry
    AlreadyRunning(TimeEntry),
    Stopped(TimeEntry),
    AlreadyIdle,
}

impl TimerTransition {
    /// Whether the call changed anything
    pub fn changed(&self) -> bool {
        matches!(self, Self::Started(_) | Self::Stopped(_))
    }
}

/// Service for labor timers
pub struct TimeTrackerService<'a> {
    storage: &'a Storage,
    clock: &'a dyn Clock,
}

impl<'a> TimeTrackerService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self::with_clock(storage, &SystemClock)
    }

    pub fn with_clock(storage: &'a Storage, clock: &'a dyn Clock) -> Self {
        Self { storage, clock }
    }

    /// The open entry for a unit, if any
    pub fn running_entry(&self, unit_id: UnitId) -> TraxResult<Option<TimeEntry>> {
        Ok(self
            .storage
            .time_entries
            .for_unit(unit_id)?
            .into_iter()
            .find(TimeEntry::is_running))
    }

    pub fn is_running(&self, unit_id: UnitId) -> TraxResult<bool> {
        Ok(self.running_entry(unit_id)?.is_some())
    }

    /// Start a timer on a unit
    pub fn start(&self, unit_id: UnitId) -> TraxResult<TimerTransition> {
        self.require_unit(unit_id)?;

        if let Some(open) = self.running_entry(unit_id)? {
            debug!(unit_id = %unit_id, "timer already running");
            return Ok(TimerTransition::AlreadyRunning(open));
        }

        let now = self.clock.now();
        let entry = TimeEntry::start(unit_id, now);
        self.storage.transaction(|s| {
            s.time_entries.upsert(entry.clone())?;
            s.units.modify(unit_id, |u| u.touch(now))?;
            Ok(())
        })?;

        info!(unit_id = %unit_id, "started timer");
        Ok(TimerTransition::Started(entry))
    }

    /// Stop the running timer on a unit
    pub fn stop(&self, unit_id: UnitId) -> TraxResult<TimerTransition> {
        self.require_unit(unit_id)?;

        let Some(mut entry) = self.running_entry(unit_id)? else {
            debug!(unit_id = %unit_id, "no timer running");
            return Ok(TimerTransition::AlreadyIdle);
        };

        let now = self.clock.now();
        entry.end = Some(now);
        self.storage.transaction(|s| {
            s.time_entries.upsert(entry.clone())?;
            s.units.modify(unit_id, |u| u.touch(now))?;
            Ok(())
        })?;

        info!(
            unit_id = %unit_id,
            seconds = entry.duration(now).num_seconds(),
            "stopped timer"
        );
        Ok(TimerTransition::Stopped(entry))
    }

    /// Start a timer and remember the unit as last worked on
    pub fn start_recording(
        &self,
        unit_id: UnitId,
        settings: &mut Settings,
        paths: &TraxPaths,
    ) -> TraxResult<TimerTransition> {
        let transition = self.start(unit_id)?;
        if transition.changed() {
            settings.record_activity(unit_id, "Started timer", paths)?;
        }
        Ok(transition)
    }

    /// Stop a timer and remember the unit as last worked on
    pub fn stop_recording(
        &self,
        unit_id: UnitId,
        settings: &mut Settings,
        paths: &TraxPaths,
    ) -> TraxResult<TimerTransition> {
        let transition = self.stop(unit_id)?;
        if transition.changed() {
            settings.record_activity(unit_id, "Stopped timer", paths)?;
        }
        Ok(transition)
    }

    /// Total labor on a unit, counting a running entry up to now
    pub fn total_duration(&self, unit_id: UnitId) -> TraxResult<Duration> {
        let now = self.clock.now();
        Ok(self
            .storage
            .time_entries
            .for_unit(unit_id)?
            .iter()
            .fold(Duration::zero(), |acc, e| acc + e.duration(now)))
    }

    /// Labor cost at an hourly rate
    pub fn labor_cost(&self, unit_id: UnitId, hourly_rate: Money) -> TraxResult<Money> {
        let seconds = self.total_duration(unit_id)?.num_seconds();
        Ok(hourly_rate.for_seconds_at_hourly(seconds))
    }

    /// Units with a timer currently running
    pub fn running_units(&self) -> TraxResult<Vec<UnitId>> {
        let mut ids: Vec<UnitId> = self
            .storage
            .time_entries
            .find_where(TimeEntry::is_running)?
            .into_iter()
            .map(|e| e.unit_id)
            .collect();
        ids.dedup();
        Ok(ids)
    }

    fn require_unit(&self, unit_id: UnitId) -> TraxResult<()> {
        if self.storage.units.exists(unit_id)? {
            Ok(())
        } else {
            Err(TraxError::unit_not_found(unit_id.to_string()))
        }
    }
}

/// Format a duration as `1h 05m` / `12m 03s`
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else {
        format!("{}m {:02}s", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::models::{Unit, UnitKind};
    use chrono::Utc;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TraxPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn add_unit(storage: &Storage) -> UnitId {
        let unit = Unit::new("XBX-101", UnitKind::Console, Utc::now());
        let id = unit.id;
        storage.units.upsert(unit).unwrap();
        id
    }

    #[test]
    fn test_double_start_leaves_one_open_entry() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TimeTrackerService::new(&storage);
        let unit = add_unit(&storage);

        let first = service.start(unit).unwrap();
        let second = service.start(unit).unwrap();

        assert!(matches!(first, TimerTransition::Started(_)));
        match (first, second) {
            (TimerTransition::Started(a), TimerTransition::AlreadyRunning(b)) => {
                assert_eq!(a.id, b.id)
            }
            other => panic!("unexpected transitions: {:?}", other),
        }
        let open = storage
            .time_entries
            .find_where(|e| e.unit_id == unit && e.is_running())
            .unwrap();
        assert_eq!(open.len(), 1);
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TimeTrackerService::new(&storage);
        let unit = add_unit(&storage);

        assert_eq!(service.stop(unit).unwrap(), TimerTransition::AlreadyIdle);
        assert_eq!(storage.time_entries.count().unwrap(), 0);
    }

    #[test]
    fn test_total_duration_is_exact() {
        let (_temp_dir, storage) = create_test_storage();
        let clock = ManualClock::new(Utc::now());
        let service = TimeTrackerService::with_clock(&storage, &clock);
        let unit = add_unit(&storage);

        service.start(unit).unwrap();
        clock.advance(Duration::seconds(754));
        service.stop(unit).unwrap();
        clock.advance(Duration::hours(5));

        assert_eq!(service.total_duration(unit).unwrap(), Duration::seconds(754));
        assert!(!service.is_running(unit).unwrap());
    }

    #[test]
    fn test_running_entry_counts_to_now() {
        let (_temp_dir, storage) = create_test_storage();
        let clock = ManualClock::new(Utc::now());
        let service = TimeTrackerService::with_clock(&storage, &clock);
        let unit = add_unit(&storage);

        service.start(unit).unwrap();
        clock.advance(Duration::minutes(10));
        service.stop(unit).unwrap();
        service.start(unit).unwrap();
        clock.advance(Duration::minutes(5));

        assert_eq!(service.total_duration(unit).unwrap(), Duration::minutes(15));
        assert_eq!(service.running_units().unwrap(), vec![unit]);
    }

    #[test]
    fn test_start_touches_unit() {
        let (_temp_dir, storage) = create_test_storage();
        let clock = ManualClock::new(Utc::now());
        let service = TimeTrackerService::with_clock(&storage, &clock);
        let unit = add_unit(&storage);

        clock.advance(Duration::days(1));
        service.start(unit).unwrap();
        assert_eq!(
            storage.units.get(unit).unwrap().unwrap().last_activity_at,
            clock.now()
        );
    }

    #[test]
    fn test_labor_cost() {
        let (_temp_dir, storage) = create_test_storage();
        let clock = ManualClock::new(Utc::now());
        let service = TimeTrackerService::with_clock(&storage, &clock);
        let unit = add_unit(&storage);

        service.start(unit).unwrap();
        clock.advance(Duration::minutes(90));
        service.stop(unit).unwrap();

        let cost = service.labor_cost(unit, Money::from_cents(1200)).unwrap();
        assert_eq!(cost, Money::from_cents(1800));
    }

    #[test]
    fn test_recording_updates_settings() {
        let (temp_dir, storage) = create_test_storage();
        let paths = TraxPaths::with_base_dir(temp_dir.path().to_path_buf());
        let service = TimeTrackerService::new(&storage);
        let unit = add_unit(&storage);
        let mut settings = Settings::default();

        service.start_recording(unit, &mut settings, &paths).unwrap();
        assert_eq!(settings.last_worked_on_unit, Some(unit));
        assert_eq!(settings.last_action_text, "Started timer");

        service.stop_recording(unit, &mut settings, &paths).unwrap();
        assert_eq!(settings.last_action_text, "Stopped timer");

        settings.last_action_text.clear();
        service.stop_recording(unit, &mut settings, &paths).unwrap();
        assert!(settings.last_action_text.is_empty());
    }

    #[test]
    fn test_unknown_unit() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TimeTrackerService::new(&storage);
        assert!(service.start(UnitId::new()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::seconds(65)), "1m 05s");
        assert_eq!(format_duration(Duration::seconds(3900)), "1h 05m");
    }
}
