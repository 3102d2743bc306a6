//! Task CLI commands
//!
//! Repair checklist management for a unit.

use clap::Subcommand;

use crate::error::{TraxError, TraxResult};
use crate::models::Task;
use crate::services::UnitService;
use crate::storage::Storage;

use super::{parse_date, resolve_unit, single_match};

/// Task subcommands
#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task to a unit's checklist
    Add {
        /// Unit title or ID
        unit: String,
        /// Task title
        title: String,
        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,
    },
    /// List a unit's checklist
    List {
        /// Unit title or ID
        unit: String,
    },
    /// Toggle a task between done and open
    Done {
        /// Task ID
        task: String,
    },
    /// Move a task to a new position (1-based)
    Move {
        /// Task ID
        task: String,
        position: usize,
    },
    /// Remove a task
    Remove {
        /// Task ID
        task: String,
    },
}

fn resolve_task(storage: &Storage, identifier: &str) -> TraxResult<Task> {
    let matches = storage.tasks.find_where(|t| t.id.matches(identifier))?;
    single_match(matches, identifier, TraxError::task_not_found)
}

fn print_checklist(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    for (i, task) in tasks.iter().enumerate() {
        let due = task
            .due_date
            .map(|d| format!(" (due {})", d))
            .unwrap_or_default();
        println!(
            "  {}. [{}] {}{}  {}",
            i + 1,
            if task.is_done { "x" } else { " " },
            task.title,
            due,
            task.id
        );
    }
}

/// Handle a task command
pub fn handle_task_command(storage: &Storage, cmd: TaskCommands) -> TraxResult<()> {
    let service = UnitService::new(storage);

    match cmd {
        TaskCommands::Add { unit, title, due } => {
            let found = resolve_unit(storage, &unit)?;
            let due = due.as_deref().map(parse_date).transpose()?;
            let task = service.add_task(found.id, &title, due)?;
            println!("Added task to {}: {}", found.title, task.title);
            println!("  ID: {}", task.id);
        }

        TaskCommands::List { unit } => {
            let found = resolve_unit(storage, &unit)?;
            println!("Tasks for {}", found.title);
            print_checklist(&service.tasks(found.id)?);
        }

        TaskCommands::Done { task } => {
            let found = resolve_task(storage, &task)?;
            let toggled = service.toggle_task(found.id)?;
            if toggled.is_done {
                println!("Done: {}", toggled.title);
            } else {
                println!("Reopened: {}", toggled.title);
            }
        }

        TaskCommands::Move { task, position } => {
            if position == 0 {
                return Err(TraxError::Validation(
                    "Position starts at 1".to_string(),
                ));
            }
            let found = resolve_task(storage, &task)?;
            let tasks = service.move_task(found.id, position - 1)?;
            print_checklist(&tasks);
        }

        TaskCommands::Remove { task } => {
            let found = resolve_task(storage, &task)?;
            let removed = service.remove_task(found.id)?;
            println!("Removed task: {}", removed.title);
        }
    }

    Ok(())
}
