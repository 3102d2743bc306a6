//! Repair task model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{TaskId, UnitId};

/// A to-do item on a unit's repair checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,

    /// Owning unit
    pub unit_id: UnitId,

    pub title: String,

    #[serde(default)]
    pub is_done: bool,

    /// Display position within the unit's checklist
    #[serde(default)]
    pub order: i32,

    pub due_date: Option<NaiveDate>,
}

impl Task {
    pub fn new(unit_id: UnitId, title: impl Into<String>, order: i32) -> Self {
        Self {
            id: TaskId::new(),
            unit_id,
            title: title.into(),
            is_done: false,
            order,
            due_date: None,
        }
    }

    pub fn toggle(&mut self) {
        self.is_done = !self.is_done;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut task = Task::new(UnitId::new(), "Replace thermal paste", 0);
        assert!(!task.is_done);
        task.toggle();
        assert!(task.is_done);
        task.toggle();
        assert!(!task.is_done);
    }
}
