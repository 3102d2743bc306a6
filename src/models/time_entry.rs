//! Labor time entry model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{TimeEntryId, UnitId};

/// One interval of labor on a unit. `end == None` means the timer is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: TimeEntryId,

    /// Owning unit
    pub unit_id: UnitId,

    pub start: DateTime<Utc>,

    pub end: Option<DateTime<Utc>>,

    #[serde(default)]
    pub note: String,
}

impl TimeEntry {
    /// Start a new running entry
    pub fn start(unit_id: UnitId, now: DateTime<Utc>) -> Self {
        Self {
            id: TimeEntryId::new(),
            unit_id,
            start: now,
            end: None,
            note: String::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.end.is_none()
    }

    /// Elapsed time, counting a running entry up to `now`
    pub fn duration(&self, now: DateTime<Utc>) -> Duration {
        self.end.unwrap_or(now) - self.start
    }
}
