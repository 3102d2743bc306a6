//! Unit service
//!
//! Check-in, editing and deletion of units, plus their task checklist,
//! photos and cost summary.

use std::path::Path;

use chrono::{Duration, NaiveDate};
use tracing::{info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{TraxError, TraxResult};
use crate::models::{
    Money, PhotoId, PhysicalGrade, Photo, Task, TaskId, Triage, Unit, UnitId, UnitKind,
    UnitStatus,
};
use crate::services::inventory::InventoryService;
use crate::services::time_tracker::TimeTrackerService;
use crate::storage::{RemovedUnit, Storage};

/// Fields captured when a unit arrives
#[derive(Debug, Clone, Default)]
pub struct CheckIn {
    pub title: String,
    pub kind: UnitKind,
    pub serial_number: Option<String>,
    pub manufacture_date: Option<NaiveDate>,
    pub physical_grade: PhysicalGrade,
    pub triage: Triage,
    pub purchase_source: Option<String>,
    pub price_paid: Option<Money>,
    pub start_date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub notes: String,
}

/// List ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitSort {
    /// Units with a running timer first, then most recently active
    #[default]
    RunningFirst,
    LastWorkedFirst,
}

/// Criteria for listing units
#[derive(Debug, Clone, Default)]
pub struct UnitFilter {
    /// Only units in one of these statuses (empty means any)
    pub statuses: Vec<UnitStatus>,
    pub search: Option<String>,
    pub tag: Option<String>,
    pub sort: UnitSort,
}

/// A unit with its computed cost and labor figures
#[derive(Debug, Clone)]
pub struct UnitSummary {
    pub unit: Unit,
    pub parts_cost: Money,
    pub labor: Duration,
    pub labor_cost: Money,
    pub open_tasks: usize,
    pub total_tasks: usize,
    pub photo_count: usize,
    pub timer_running: bool,
    /// Sale (or asking) price minus every cost; `None` without a price
    pub estimated_profit: Option<Money>,
}

/// Service for unit management
pub struct UnitService<'a> {
    storage: &'a Storage,
    clock: &'a dyn Clock,
}

impl<'a> UnitService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self::with_clock(storage, &SystemClock)
    }

    pub fn with_clock(storage: &'a Storage, clock: &'a dyn Clock) -> Self {
        Self { storage, clock }
    }

    /// Check in a new unit
    pub fn check_in(&self, input: CheckIn) -> TraxResult<Unit> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(TraxError::Validation(
                "Unit number cannot be empty".into(),
            ));
        }

        let now = self.clock.now();
        let mut unit = Unit::new(title, input.kind, now);
        unit.serial_number = non_empty(input.serial_number);
        unit.manufacture_date = input.manufacture_date;
        unit.physical_grade = input.physical_grade;
        unit.triage = input.triage;
        unit.purchase_source = non_empty(input.purchase_source);
        unit.price_paid = input.price_paid;
        unit.start_date = input.start_date.or(Some(now.date_naive()));
        unit.notes = input.notes;
        for tag in &input.tags {
            unit.add_tag(tag);
        }

        unit.validate()
            .map_err(|e| TraxError::Validation(e.to_string()))?;

        self.storage.transaction(|s| s.units.upsert(unit.clone()))?;

        info!(unit = %unit.title, kind = %unit.kind, "checked in unit");
        Ok(unit)
    }

    pub fn get(&self, id: UnitId) -> TraxResult<Option<Unit>> {
        self.storage.units.get(id)
    }

    /// Get a unit or fail with NotFound
    pub fn require(&self, id: UnitId) -> TraxResult<Unit> {
        self.get(id)?
            .ok_or_else(|| TraxError::unit_not_found(id.to_string()))
    }

    /// Find a unit by title, full id or short id
    pub fn find(&self, identifier: &str) -> TraxResult<Option<Unit>> {
        if let Some(unit) = self.storage.units.get_by_title(identifier)? {
            return Ok(Some(unit));
        }

        if let Ok(id) = identifier.parse::<UnitId>() {
            return self.storage.units.get(id);
        }

        let mut matches = self.storage.units.find_where(|u| u.id.matches(identifier))?;
        Ok(if matches.len() == 1 { matches.pop() } else { None })
    }

    /// List units matching a filter
    pub fn list(&self, filter: &UnitFilter) -> TraxResult<Vec<Unit>> {
        let mut units = self.storage.units.find_where(|u| {
            (filter.statuses.is_empty() || filter.statuses.contains(&u.status))
                && filter
                    .search
                    .as_deref()
                    .map_or(true, |q| u.matches_search(q))
                && filter.tag.as_deref().map_or(true, |t| u.has_tag(t))
        })?;

        match filter.sort {
            UnitSort::RunningFirst => {
                let running = TimeTrackerService::new(self.storage).running_units()?;
                units.sort_by(|a, b| {
                    let a_run = running.contains(&a.id);
                    let b_run = running.contains(&b.id);
                    b_run
                        .cmp(&a_run)
                        .then_with(|| b.last_activity_at.cmp(&a.last_activity_at))
                });
            }
            UnitSort::LastWorkedFirst => {
                units.sort_by(|a, b| b.last_activity_at.cmp(&a.last_activity_at));
            }
        }

        Ok(units)
    }

    /// Save edits to a unit
    pub fn update(&self, mut unit: Unit) -> TraxResult<Unit> {
        if !self.storage.units.exists(unit.id)? {
            return Err(TraxError::unit_not_found(unit.id.to_string()));
        }

        unit.title = unit.title.trim().to_string();
        unit.validate()
            .map_err(|e| TraxError::Validation(e.to_string()))?;
        unit.touch(self.clock.now());

        self.storage.transaction(|s| s.units.upsert(unit.clone()))?;
        Ok(unit)
    }

    /// Move a unit to a new workflow status
    pub fn set_status(&self, id: UnitId, status: UnitStatus) -> TraxResult<Unit> {
        let mut unit = self.require(id)?;
        unit.status = status;
        self.update(unit)
    }

    pub fn add_tag(&self, id: UnitId, tag: &str) -> TraxResult<bool> {
        let mut unit = self.require(id)?;
        let added = unit.add_tag(tag);
        if added {
            self.update(unit)?;
        }
        Ok(added)
    }

    pub fn remove_tag(&self, id: UnitId, tag: &str) -> TraxResult<bool> {
        let mut unit = self.require(id)?;
        let removed = unit.remove_tag(tag);
        if removed {
            self.update(unit)?;
        }
        Ok(removed)
    }

    /// Delete a unit with its tasks, photos, time entries and part uses
    ///
    /// Stock taken by the unit's part uses is not returned.
    pub fn delete(&self, id: UnitId) -> TraxResult<RemovedUnit> {
        let removed = self.storage.transaction(|s| s.delete_unit(id))?;

        for photo in &removed.photos {
            if let Err(e) = self.storage.photo_files().remove(&photo.filename) {
                warn!(file = %photo.filename, error = %e, "failed to delete photo file");
            }
        }

        Ok(removed)
    }

    // ---- Tasks ----

    pub fn tasks(&self, unit_id: UnitId) -> TraxResult<Vec<Task>> {
        self.storage.tasks.for_unit(unit_id)
    }

    /// Append a task to a unit's checklist
    pub fn add_task(
        &self,
        unit_id: UnitId,
        title: &str,
        due_date: Option<NaiveDate>,
    ) -> TraxResult<Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TraxError::Validation("Task title cannot be empty".into()));
        }
        self.require(unit_id)?;

        let order = self
            .tasks(unit_id)?
            .iter()
            .map(|t| t.order + 1)
            .max()
            .unwrap_or(0);
        let mut task = Task::new(unit_id, title, order);
        task.due_date = due_date;

        let now = self.clock.now();
        self.storage.transaction(|s| {
            s.tasks.upsert(task.clone())?;
            s.units.modify(unit_id, |u| u.touch(now))?;
            Ok(())
        })?;
        Ok(task)
    }

    /// Flip a task's done flag
    pub fn toggle_task(&self, task_id: TaskId) -> TraxResult<Task> {
        let mut task = self.storage.tasks.require(task_id)?;
        task.toggle();

        let now = self.clock.now();
        self.storage.transaction(|s| {
            s.tasks.upsert(task.clone())?;
            s.units.modify(task.unit_id, |u| u.touch(now))?;
            Ok(())
        })?;
        Ok(task)
    }

    /// Move a task to a new position (0-based) and renumber the checklist
    pub fn move_task(&self, task_id: TaskId, position: usize) -> TraxResult<Vec<Task>> {
        let task = self.storage.tasks.require(task_id)?;

        let mut tasks = self.tasks(task.unit_id)?;
        let from = tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| TraxError::task_not_found(task_id.to_string()))?;
        let moved = tasks.remove(from);
        tasks.insert(position.min(tasks.len()), moved);

        for (i, t) in tasks.iter_mut().enumerate() {
            t.order = i as i32;
        }

        self.storage.transaction(|s| {
            for t in &tasks {
                s.tasks.upsert(t.clone())?;
            }
            Ok(())
        })?;
        Ok(tasks)
    }

    pub fn remove_task(&self, task_id: TaskId) -> TraxResult<Task> {
        let task = self.storage.tasks.require(task_id)?;
        self.storage.transaction(|s| {
            s.tasks.delete(task_id)?;
            Ok(())
        })?;
        Ok(task)
    }

    // ---- Photos ----

    pub fn photos(&self, unit_id: UnitId) -> TraxResult<Vec<Photo>> {
        self.storage.photos.for_unit(unit_id)
    }

    /// Attach image bytes to a unit under a generated filename
    pub fn add_photo(&self, unit_id: UnitId, bytes: &[u8], caption: &str) -> TraxResult<Photo> {
        self.require(unit_id)?;

        let now = self.clock.now();
        let photo_id = PhotoId::new();
        let filename = format!("{}.jpg", photo_id.to_uuid_string());
        let photo = Photo {
            id: photo_id,
            ..Photo::new(unit_id, filename, caption.trim(), now)
        };

        self.storage.photo_files().write(&photo.filename, bytes)?;

        let committed = self.storage.transaction(|s| {
            s.photos.upsert(photo.clone())?;
            s.units.modify(unit_id, |u| u.touch(now))?;
            Ok(())
        });
        if let Err(e) = committed {
            let _ = self.storage.photo_files().remove(&photo.filename);
            return Err(e);
        }

        info!(unit_id = %unit_id, file = %photo.filename, bytes = bytes.len(), "added photo");
        Ok(photo)
    }

    /// Attach an image file from disk
    pub fn add_photo_from_path(
        &self,
        unit_id: UnitId,
        source: &Path,
        caption: &str,
    ) -> TraxResult<Photo> {
        let bytes = std::fs::read(source).map_err(|e| {
            TraxError::Io(format!("Failed to read {}: {}", source.display(), e))
        })?;
        self.add_photo(unit_id, &bytes, caption)
    }

    /// Delete a photo record and its file
    pub fn remove_photo(&self, photo_id: PhotoId) -> TraxResult<Photo> {
        let photo = self.storage.photos.require(photo_id)?;
        self.storage.transaction(|s| {
            s.photos.delete(photo_id)?;
            Ok(())
        })?;

        if let Err(e) = self.storage.photo_files().remove(&photo.filename) {
            warn!(file = %photo.filename, error = %e, "failed to delete photo file");
        }
        Ok(photo)
    }

    // ---- Summary ----

    /// Cost and labor roll-up for a unit
    pub fn summary(&self, unit: &Unit, hourly_rate: Money) -> TraxResult<UnitSummary> {
        let inventory = InventoryService::with_clock(self.storage, self.clock);
        let tracker = TimeTrackerService::with_clock(self.storage, self.clock);

        let parts_cost = inventory.parts_cost(unit.id)?;
        let labor = tracker.total_duration(unit.id)?;
        let labor_cost = hourly_rate.for_seconds_at_hourly(labor.num_seconds());
        let tasks = self.tasks(unit.id)?;

        let estimated_profit = unit.sale.effective_price().map(|price| {
            price
                - unit.price_paid.unwrap_or_default()
                - parts_cost
                - labor_cost
                - unit.sale.shipping_cost.unwrap_or_default()
                - unit.sale.fees.unwrap_or_default()
        });

        Ok(UnitSummary {
            unit: unit.clone(),
            parts_cost,
            labor,
            labor_cost,
            open_tasks: tasks.iter().filter(|t| !t.is_done).count(),
            total_tasks: tasks.len(),
            photo_count: self.storage.photos.for_unit(unit.id)?.len(),
            timer_running: tracker.is_running(unit.id)?,
            estimated_profit,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::paths::TraxPaths;
    use crate::models::Part;
    use chrono::Utc;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TraxPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn check_in(service: &UnitService, title: &str) -> Unit {
        service
            .check_in(CheckIn {
                title: title.into(),
                ..Default::default()
            })
            .unwrap()
    }

    #[test]
    fn test_check_in_requires_title() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UnitService::new(&storage);

        let err = service
            .check_in(CheckIn {
                title: "   ".into(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(storage.units.count().unwrap(), 0);
    }

    #[test]
    fn test_check_in_sets_fields() {
        let (_temp_dir, storage) = create_test_storage();
        let clock = ManualClock::new(Utc::now());
        let service = UnitService::with_clock(&storage, &clock);

        let unit = service
            .check_in(CheckIn {
                title: " XBX-101 ".into(),
                kind: UnitKind::Controller,
                serial_number: Some("  ".into()),
                price_paid: Some(Money::from_cents(4000)),
                tags: vec!["rrod".into(), "RROD".into()],
                ..Default::default()
            })
            .unwrap();

        assert_eq!(unit.title, "XBX-101");
        assert_eq!(unit.kind, UnitKind::Controller);
        assert_eq!(unit.serial_number, None);
        assert_eq!(unit.tags, vec!["rrod"]);
        assert_eq!(unit.created_at, clock.now());
        assert_eq!(unit.start_date, Some(clock.now().date_naive()));
    }

    #[test]
    fn test_find_by_title_and_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UnitService::new(&storage);
        let unit = check_in(&service, "XBX-101");

        assert_eq!(service.find("xbx-101").unwrap().unwrap().id, unit.id);
        assert_eq!(service.find(&unit.id.short()).unwrap().unwrap().id, unit.id);
        assert_eq!(
            service.find(&unit.id.to_uuid_string()).unwrap().unwrap().id,
            unit.id
        );
        assert!(service.find("nothing").unwrap().is_none());
    }

    #[test]
    fn test_list_running_first() {
        let (_temp_dir, storage) = create_test_storage();
        let clock = ManualClock::new(Utc::now());
        let service = UnitService::with_clock(&storage, &clock);

        let oldest = check_in(&service, "A");
        clock.advance(Duration::minutes(1));
        let middle = check_in(&service, "B");
        clock.advance(Duration::minutes(1));
        let newest = check_in(&service, "C");

        // Timer on the least recently active unit
        TimeTrackerService::with_clock(&storage, &clock)
            .start(oldest.id)
            .unwrap();
        storage
            .units
            .modify(oldest.id, |u| u.last_activity_at = middle.created_at - Duration::hours(1))
            .unwrap();

        let ids: Vec<_> = service
            .list(&UnitFilter::default())
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec![oldest.id, newest.id, middle.id]);

        let ids: Vec<_> = service
            .list(&UnitFilter {
                sort: UnitSort::LastWorkedFirst,
                ..Default::default()
            })
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec![newest.id, middle.id, oldest.id]);
    }

    #[test]
    fn test_list_filters() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UnitService::new(&storage);
        let a = check_in(&service, "XBX-101");
        let b = check_in(&service, "PS2-7");

        service.set_status(b.id, UnitStatus::Sold).unwrap();
        service.add_tag(a.id, "jasper").unwrap();

        let sold = service
            .list(&UnitFilter {
                statuses: vec![UnitStatus::Sold],
                ..Default::default()
            })
            .unwrap();
        assert_eq!(sold.len(), 1);
        assert_eq!(sold[0].id, b.id);

        let searched = service
            .list(&UnitFilter {
                search: Some("xbx".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(searched.len(), 1);

        let tagged = service
            .list(&UnitFilter {
                tag: Some("JASPER".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(tagged[0].id, a.id);
    }

    #[test]
    fn test_update_rejects_empty_title() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UnitService::new(&storage);
        let mut unit = check_in(&service, "XBX-101");

        unit.title = "".into();
        assert!(service.update(unit).unwrap_err().is_validation());
    }

    #[test]
    fn test_tasks_order_and_move() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UnitService::new(&storage);
        let unit = check_in(&service, "XBX-101");

        let a = service.add_task(unit.id, "Open case", None).unwrap();
        let b = service.add_task(unit.id, "Reflow", None).unwrap();
        let c = service.add_task(unit.id, "Test", None).unwrap();
        assert_eq!((a.order, b.order, c.order), (0, 1, 2));
        assert!(service.add_task(unit.id, " ", None).is_err());

        let moved = service.move_task(c.id, 0).unwrap();
        let titles: Vec<_> = moved.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Test", "Open case", "Reflow"]);
        let orders: Vec<_> = service.tasks(unit.id).unwrap().iter().map(|t| t.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);

        assert!(service.toggle_task(a.id).unwrap().is_done);
        service.remove_task(b.id).unwrap();
        assert_eq!(service.tasks(unit.id).unwrap().len(), 2);
    }

    #[test]
    fn test_photos_write_side_files() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UnitService::new(&storage);
        let unit = check_in(&service, "XBX-101");

        let photo = service.add_photo(unit.id, b"\xFF\xD8jpeg", "front").unwrap();
        assert!(photo.filename.ends_with(".jpg"));
        assert_eq!(
            storage.photo_files().read(&photo.filename).unwrap(),
            b"\xFF\xD8jpeg"
        );

        service.remove_photo(photo.id).unwrap();
        assert!(!storage.photo_files().exists(&photo.filename));
        assert!(service.photos(unit.id).unwrap().is_empty());
    }

    #[test]
    fn test_delete_cascades_without_credit() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UnitService::new(&storage);
        let unit = check_in(&service, "XBX-101");

        let part = Part::new("Capacitor kit", "CAP-100").with_stock(5, Money::from_cents(250));
        let part_id = part.id;
        storage.parts.upsert(part).unwrap();
        InventoryService::new(&storage)
            .attach(part_id, unit.id, 3, "")
            .unwrap();
        service.add_task(unit.id, "Reflow", None).unwrap();
        let photo = service.add_photo(unit.id, b"img", "").unwrap();

        let removed = service.delete(unit.id).unwrap();
        assert_eq!(removed.part_uses.len(), 1);
        assert_eq!(storage.part_uses.count().unwrap(), 0);
        assert_eq!(storage.tasks.count().unwrap(), 0);
        assert!(!storage.photo_files().exists(&photo.filename));
        assert_eq!(storage.parts.get(part_id).unwrap().unwrap().qty_on_hand, 2);
        assert!(service.delete(unit.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_summary_profit() {
        let (_temp_dir, storage) = create_test_storage();
        let clock = ManualClock::new(Utc::now());
        let service = UnitService::with_clock(&storage, &clock);
        let mut unit = service
            .check_in(CheckIn {
                title: "XBX-101".into(),
                price_paid: Some(Money::from_cents(3000)),
                ..Default::default()
            })
            .unwrap();

        let part = Part::new("Capacitor kit", "CAP-100").with_stock(5, Money::from_cents(250));
        let part_id = part.id;
        storage.parts.upsert(part).unwrap();
        InventoryService::with_clock(&storage, &clock)
            .attach(part_id, unit.id, 2, "")
            .unwrap();

        let tracker = TimeTrackerService::with_clock(&storage, &clock);
        tracker.start(unit.id).unwrap();
        clock.advance(Duration::hours(1));
        tracker.stop(unit.id).unwrap();
        service.add_task(unit.id, "Ship", None).unwrap();

        unit.sale.sold_price = Some(Money::from_cents(9000));
        unit.sale.fees = Some(Money::from_cents(900));
        let unit = service.update(unit).unwrap();

        let summary = service.summary(&unit, Money::from_cents(1200)).unwrap();
        assert_eq!(summary.parts_cost, Money::from_cents(500));
        assert_eq!(summary.labor, Duration::hours(1));
        assert_eq!(summary.labor_cost, Money::from_cents(1200));
        assert_eq!(summary.open_tasks, 1);
        assert!(!summary.timer_running);
        // 9000 - 3000 - 500 - 1200 - 900
        assert_eq!(summary.estimated_profit, Some(Money::from_cents(3400)));
    }
}
