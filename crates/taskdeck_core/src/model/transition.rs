//! Status transition table for toggle semantics.
//!
//! # Responsibility
//! - Declare the toggle cycle as data so the table itself can be tested.
//! - Apply the completion-stamp effect tied to each transition.
//!
//! # Invariants
//! - Every status appears exactly once as a transition source.
//! - Transitions into `Completed` stamp `completed_at`; every other
//!   transition clears it.

use crate::model::task::{Task, TaskStatus};

/// Effect a transition has on the completion timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionEffect {
    /// Set `completed_at` to the toggle time.
    Stamp,
    /// Reset `completed_at` to `None`.
    Clear,
}

/// One row of the toggle cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub from: TaskStatus,
    pub to: TaskStatus,
    pub effect: CompletionEffect,
}

/// Toggle cycle: pending -> in-progress -> completed -> pending.
///
/// `Cancelled` is outside the cycle proper; toggling a cancelled task
/// reactivates it as pending so the table stays total over the status set.
pub const TOGGLE_TRANSITIONS: &[StatusTransition] = &[
    StatusTransition {
        from: TaskStatus::Pending,
        to: TaskStatus::InProgress,
        effect: CompletionEffect::Clear,
    },
    StatusTransition {
        from: TaskStatus::InProgress,
        to: TaskStatus::Completed,
        effect: CompletionEffect::Stamp,
    },
    StatusTransition {
        from: TaskStatus::Completed,
        to: TaskStatus::Pending,
        effect: CompletionEffect::Clear,
    },
    StatusTransition {
        from: TaskStatus::Cancelled,
        to: TaskStatus::Pending,
        effect: CompletionEffect::Clear,
    },
];

/// Looks up the transition leaving `from`.
pub fn advance(from: TaskStatus) -> &'static StatusTransition {
    TOGGLE_TRANSITIONS
        .iter()
        .find(|transition| transition.from == from)
        .expect("transition table covers every status")
}

/// Returns a copy of `task` advanced one step along the toggle cycle,
/// with the completion stamp applied or cleared as the table dictates.
pub fn apply_toggle(task: &Task, now_ms: i64) -> Task {
    let transition = advance(task.status);
    let mut next = task.clone();
    next.status = transition.to;
    next.completed_at = match transition.effect {
        CompletionEffect::Stamp => Some(now_ms),
        CompletionEffect::Clear => None,
    };
    next
}

#[cfg(test)]
mod tests {
    use super::{advance, apply_toggle, CompletionEffect, TOGGLE_TRANSITIONS};
    use crate::model::task::{Task, TaskPriority, TaskStatus};

    #[test]
    fn every_status_has_exactly_one_outgoing_transition() {
        for status in [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::Cancelled,
        ] {
            let outgoing = TOGGLE_TRANSITIONS
                .iter()
                .filter(|transition| transition.from == status)
                .count();
            assert_eq!(outgoing, 1, "status {status:?} must have one transition");
        }
    }

    #[test]
    fn only_completion_transition_stamps() {
        for transition in TOGGLE_TRANSITIONS {
            if transition.to == TaskStatus::Completed {
                assert_eq!(transition.effect, CompletionEffect::Stamp);
            } else {
                assert_eq!(transition.effect, CompletionEffect::Clear);
            }
        }
    }

    #[test]
    fn three_toggles_return_to_the_original_status() {
        let task = Task::new("water plants", TaskPriority::Low);

        let first = apply_toggle(&task, 100);
        assert_eq!(first.status, TaskStatus::InProgress);
        assert!(first.completed_at.is_none());

        let second = apply_toggle(&first, 200);
        assert_eq!(second.status, TaskStatus::Completed);
        assert_eq!(second.completed_at, Some(200));

        let third = apply_toggle(&second, 300);
        assert_eq!(third.status, task.status);
        assert!(third.completed_at.is_none());
    }

    #[test]
    fn cancelled_tasks_reactivate_as_pending() {
        let transition = advance(TaskStatus::Cancelled);
        assert_eq!(transition.to, TaskStatus::Pending);
        assert_eq!(transition.effect, CompletionEffect::Clear);
    }

    #[test]
    fn toggle_preserves_identity_and_creation_time() {
        let task = Task::new("call dentist", TaskPriority::Urgent);
        let toggled = apply_toggle(&task, 500);
        assert_eq!(toggled.id, task.id);
        assert_eq!(toggled.created_at, task.created_at);
        assert_eq!(toggled.title, task.title);
    }
}
