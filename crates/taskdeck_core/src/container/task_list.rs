//! Task list state container.
//!
//! # Responsibility
//! - Own one authoritative snapshot of tasks plus transient UI flags.
//! - Route every mutation through the repository with optimistic apply and
//!   explicit compensation.
//! - Publish named events after each snapshot change.
//!
//! # Invariants
//! - The container is the sole mutator of its snapshot; callers observe it
//!   read-only through [`TaskListContainer::snapshot`].
//! - `initialize` populates the snapshot at most once; only a failed
//!   attempt may be retried.
//! - Failures never panic and never escape: they land in
//!   `TaskListState::error` as display text.

use crate::container::optimistic::{revert, AppliedChange};
use crate::events::{payload, EventBus};
use crate::filter::TaskFilter;
use crate::model::task::{normalize_tags, now_epoch_ms, Task, TaskId, TaskPriority};
use crate::model::transition::apply_toggle;
use crate::repo::task_repo::{RepoError, TaskListQuery, TaskRepository};
use log::warn;

pub const EVENT_SNAPSHOT_CHANGED: &str = "snapshot_changed";
pub const EVENT_TASK_CREATED: &str = "task_created";
pub const EVENT_TASK_UPDATED: &str = "task_updated";
pub const EVENT_TASK_DELETED: &str = "task_deleted";
pub const EVENT_TASKS_REFRESHED: &str = "tasks_refreshed";

/// Input for creating one task through the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub tags: Vec<String>,
    pub due_at: Option<i64>,
}

impl TaskDraft {
    /// Draft with medium priority and no extras.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: TaskPriority::Medium,
            tags: Vec::new(),
            due_at: None,
        }
    }
}

/// Authoritative snapshot owned by the container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListState {
    pub tasks: Vec<Task>,
    pub loading: bool,
    /// Display text of the last failure; `None` while healthy.
    pub error: Option<String>,
    pub filter: TaskFilter,
    pub initialized: bool,
}

/// State container over one task repository.
pub struct TaskListContainer<R: TaskRepository> {
    repo: R,
    state: TaskListState,
    events: EventBus,
    revision: u64,
}

impl<R: TaskRepository> TaskListContainer<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            state: TaskListState::default(),
            events: EventBus::new(),
            revision: 0,
        }
    }

    /// Read-only view of the current snapshot.
    pub fn snapshot(&self) -> &TaskListState {
        &self.state
    }

    /// Monotonic counter bumped on every snapshot change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Subscription point for snapshot and task events.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Populates the snapshot from the repository exactly once.
    ///
    /// Calls after the first successful completion are no-ops. On failure
    /// the prior (empty) snapshot stays intact, the error channel is set
    /// and a later call may retry.
    pub fn initialize(&mut self) {
        if self.state.initialized {
            return;
        }
        self.refresh();
        if self.state.error.is_none() {
            self.state.initialized = true;
        }
    }

    /// Re-fetches the snapshot from the repository unconditionally.
    pub fn refresh(&mut self) {
        self.state.loading = true;
        self.state.error = None;
        self.notify_changed();

        match self.repo.list_tasks(&TaskListQuery::default()) {
            Ok(tasks) => {
                self.state.tasks = tasks;
                self.state.loading = false;
                self.notify_changed();
                let count = self.state.tasks.len().to_string();
                self.events
                    .publish(EVENT_TASKS_REFRESHED, &payload(&[("count", &count)]));
            }
            Err(err) => {
                // Prior snapshot stays intact.
                self.state.loading = false;
                self.record_error("refresh", &err);
                self.notify_changed();
            }
        }
    }

    /// Creates a task optimistically.
    ///
    /// Validation runs synchronously before any I/O. The new task is
    /// appended to the snapshot first; a persistence failure rolls the
    /// append back and sets the error channel.
    ///
    /// Returns the new ID on success.
    pub fn create(&mut self, draft: TaskDraft) -> Option<TaskId> {
        let mut task = Task::new(draft.title, draft.priority);
        task.description = draft.description;
        task.due_at = draft.due_at;
        task.tags = normalize_tags(&draft.tags);

        if let Err(err) = task.validate() {
            self.state.error = Some(err.to_string());
            self.notify_changed();
            return None;
        }

        let change = AppliedChange::Inserted { id: task.id };
        self.state.tasks.push(task.clone());
        self.notify_changed();

        match self.repo.create_task(&task) {
            Ok(id) => {
                self.events.publish(
                    EVENT_TASK_CREATED,
                    &payload(&[("id", &id.to_string()), ("title", &task.title)]),
                );
                Some(id)
            }
            Err(err) => {
                revert(&mut self.state.tasks, change);
                self.record_error("create", &err);
                self.notify_changed();
                None
            }
        }
    }

    /// Replaces the task with matching ID, optimistically.
    ///
    /// An ID absent from the snapshot sets a not-found error; nothing is
    /// sent to the repository in that case.
    pub fn update(&mut self, task: Task) {
        if let Err(err) = task.validate() {
            self.state.error = Some(err.to_string());
            self.notify_changed();
            return;
        }

        let Some(position) = self.state.tasks.iter().position(|t| t.id == task.id) else {
            self.record_error("update", &RepoError::NotFound(task.id));
            self.notify_changed();
            return;
        };

        let previous = std::mem::replace(&mut self.state.tasks[position], task.clone());
        let change = AppliedChange::Replaced { previous };
        self.notify_changed();

        match self.repo.update_task(&task) {
            Ok(()) => {
                self.events.publish(
                    EVENT_TASK_UPDATED,
                    &payload(&[("id", &task.id.to_string())]),
                );
            }
            Err(err) => {
                revert(&mut self.state.tasks, change);
                self.record_error("update", &err);
                self.notify_changed();
            }
        }
    }

    /// Removes the task with matching ID, optimistically.
    ///
    /// An absent ID is a silent no-op; repeating a delete never raises.
    pub fn delete(&mut self, id: TaskId) {
        let Some(position) = self.state.tasks.iter().position(|t| t.id == id) else {
            return;
        };

        let removed = self.state.tasks.remove(position);
        let change = AppliedChange::Removed {
            task: removed,
            index: position,
        };
        self.notify_changed();

        match self.repo.delete_task(id) {
            Ok(_) => {
                self.events
                    .publish(EVENT_TASK_DELETED, &payload(&[("id", &id.to_string())]));
            }
            Err(err) => {
                revert(&mut self.state.tasks, change);
                self.record_error("delete", &err);
                self.notify_changed();
            }
        }
    }

    /// Advances the task one step along the toggle cycle.
    pub fn toggle_status(&mut self, id: TaskId) {
        let Some(task) = self.state.tasks.iter().find(|t| t.id == id) else {
            self.record_error("toggle_status", &RepoError::NotFound(id));
            self.notify_changed();
            return;
        };

        let toggled = apply_toggle(task, now_epoch_ms());
        self.update(toggled);
    }

    /// Stores the active filter for the derived view.
    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.state.filter = filter;
        self.notify_changed();
    }

    pub fn clear_filter(&mut self) {
        self.set_filter(TaskFilter::default());
    }

    /// Derived visible view; never mutates the snapshot.
    pub fn visible_tasks(&self) -> Vec<Task> {
        self.state.filter.apply(&self.state.tasks)
    }

    pub fn clear_error(&mut self) {
        if self.state.error.take().is_some() {
            self.notify_changed();
        }
    }

    fn record_error(&mut self, operation: &str, err: &RepoError) {
        warn!("event=container_error module=container status=error operation={operation} error={err}");
        self.state.error = Some(err.to_string());
    }

    fn notify_changed(&mut self) {
        self.revision += 1;
        let revision = self.revision.to_string();
        self.events
            .publish(EVENT_SNAPSHOT_CHANGED, &payload(&[("revision", &revision)]));
    }
}
