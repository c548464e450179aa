//! Compensation records for two-phase optimistic edits.
//!
//! A tentative snapshot edit produces an [`AppliedChange`]; when the
//! persistence call fails, [`revert`] undoes exactly that edit. Keeping the
//! rollback as data makes the compensation path testable without a failing
//! backend.

use crate::model::task::{Task, TaskId};

/// Record of one tentative snapshot edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedChange {
    /// A task was appended; rollback removes it by ID.
    Inserted { id: TaskId },
    /// A task was replaced; rollback restores the previous value.
    Replaced { previous: Task },
    /// A task was removed; rollback reinserts it at its old position.
    Removed { task: Task, index: usize },
}

/// Undoes one tentative edit on the snapshot.
pub fn revert(tasks: &mut Vec<Task>, change: AppliedChange) {
    match change {
        AppliedChange::Inserted { id } => {
            tasks.retain(|task| task.id != id);
        }
        AppliedChange::Replaced { previous } => {
            if let Some(slot) = tasks.iter_mut().find(|task| task.id == previous.id) {
                *slot = previous;
            }
        }
        AppliedChange::Removed { task, index } => {
            let index = index.min(tasks.len());
            tasks.insert(index, task);
        }
    }
}
