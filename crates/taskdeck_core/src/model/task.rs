//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record shared by every repository backend.
//! - Provide factory constructors that stamp identity and creation time.
//! - Enforce structural invariants before any persistence write.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `created_at` is stamped once at construction and never changes.
//! - `completed_at` is `Some` exactly when `status == Completed`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for every task record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created but not started.
    Pending,
    /// Work is underway.
    InProgress,
    /// Finished successfully.
    Completed,
    /// No longer actionable.
    Cancelled,
}

impl TaskStatus {
    /// Ordering rank used by status-keyed sorting.
    pub fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::InProgress => 1,
            Self::Completed => 2,
            Self::Cancelled => 3,
        }
    }
}

/// Task importance classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// Ordering rank used by priority-keyed sorting. Higher is more urgent.
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
            Self::Urgent => 3,
        }
    }
}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable global ID used for lookup, update targeting and auditing.
    pub id: TaskId,
    /// Short free-text summary. Must not be blank.
    pub title: String,
    /// Longer free-text body. May be empty.
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// Unordered labels, lowercase and deduplicated per task.
    pub tags: Vec<String>,
    /// Unix epoch milliseconds, stamped at construction.
    pub created_at: i64,
    /// Optional due moment in epoch milliseconds.
    pub due_at: Option<i64>,
    /// Present exactly while `status == Completed`.
    pub completed_at: Option<i64>,
}

/// Structural validation failures for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty after trimming.
    BlankTitle,
    /// `completed_at` presence disagrees with the status.
    CompletionStampMismatch {
        status: TaskStatus,
        has_completed_at: bool,
    },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "task title cannot be blank"),
            Self::CompletionStampMismatch {
                status,
                has_completed_at,
            } => write!(
                f,
                "completed_at presence ({has_completed_at}) does not match status {status:?}"
            ),
        }
    }
}

impl Error for TaskValidationError {}

impl Task {
    /// Creates a new pending task with a generated stable ID and the current
    /// time as creation stamp.
    pub fn new(title: impl Into<String>, priority: TaskPriority) -> Self {
        Self::with_parts(Uuid::new_v4(), title, priority, now_epoch_ms())
    }

    /// Creates a task with caller-provided identity and creation time.
    ///
    /// Used by import and wire-decoding paths where both already exist
    /// externally. The provided `id` must remain stable for the task
    /// lifetime.
    pub fn with_parts(
        id: TaskId,
        title: impl Into<String>,
        priority: TaskPriority,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            status: TaskStatus::Pending,
            priority,
            tags: Vec::new(),
            created_at,
            due_at: None,
            completed_at: None,
        }
    }

    /// Checks structural invariants.
    ///
    /// Repositories call this before every write and after every row decode,
    /// so invalid state is rejected instead of silently persisted or masked.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::BlankTitle);
        }

        let has_completed_at = self.completed_at.is_some();
        if has_completed_at != (self.status == TaskStatus::Completed) {
            return Err(TaskValidationError::CompletionStampMismatch {
                status: self.status,
                has_completed_at,
            });
        }

        Ok(())
    }

    /// Replaces the tag set with a normalized, deduplicated copy.
    pub fn set_tags(&mut self, tags: &[String]) {
        self.tags = normalize_tags(tags);
    }
}

/// Normalizes one tag value: trimmed, lowercase, `None` when blank.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes and deduplicates tag values.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut unique = BTreeSet::new();
    for tag in tags {
        if let Some(value) = normalize_tag(tag) {
            unique.insert(value);
        }
    }
    unique.into_iter().collect()
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}

#[cfg(test)]
mod tests {
    use super::{normalize_tag, normalize_tags, Task, TaskPriority, TaskStatus, TaskValidationError};

    #[test]
    fn new_task_starts_pending_without_completion_stamp() {
        let task = Task::new("write report", TaskPriority::Medium);
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.completed_at.is_none());
        assert!(task.created_at > 0);
        assert!(task.validate().is_ok());
    }

    #[test]
    fn blank_title_fails_validation() {
        let task = Task::new("   ", TaskPriority::Low);
        assert_eq!(task.validate(), Err(TaskValidationError::BlankTitle));
    }

    #[test]
    fn completion_stamp_must_match_status() {
        let mut task = Task::new("ship release", TaskPriority::High);
        task.completed_at = Some(1_700_000_000_000);
        assert!(matches!(
            task.validate(),
            Err(TaskValidationError::CompletionStampMismatch {
                status: TaskStatus::Pending,
                has_completed_at: true,
            })
        ));

        task.status = TaskStatus::Completed;
        assert!(task.validate().is_ok());

        task.completed_at = None;
        assert!(matches!(
            task.validate(),
            Err(TaskValidationError::CompletionStampMismatch {
                status: TaskStatus::Completed,
                has_completed_at: false,
            })
        ));
    }

    #[test]
    fn tags_are_normalized_and_deduplicated() {
        let raw = vec![
            "Home".to_string(),
            " home ".to_string(),
            "".to_string(),
            "Errands".to_string(),
        ];
        assert_eq!(normalize_tags(&raw), vec!["errands", "home"]);
        assert_eq!(normalize_tag("  "), None);
    }
}
