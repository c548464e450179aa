//! Derived-view filtering and sorting.
//!
//! # Responsibility
//! - Compute the visible subset of a task snapshot from predicates plus an
//!   optional sort key and direction.
//!
//! # Invariants
//! - Filtering never mutates the input; the snapshot order is preserved
//!   whenever no sort key is set.
//! - Sorting is stable: equal keys keep their snapshot order in either
//!   direction.

use crate::model::task::{Task, TaskPriority, TaskStatus};
use std::cmp::Ordering;

/// Sort key for the derived view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
    /// Tasks without a due moment sort after every dated task.
    DueAt,
    /// Ranked low -> urgent.
    Priority,
    /// Case-insensitive.
    Title,
    /// Ranked pending -> in-progress -> completed -> cancelled.
    Status,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Predicates and ordering for the visible view.
///
/// The default filter matches everything and applies no ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Exact tag membership, case-insensitive.
    pub tag: Option<String>,
    /// Case-insensitive substring over title and description.
    pub text: Option<String>,
    pub sort: Option<SortKey>,
    pub direction: SortDirection,
}

impl TaskFilter {
    /// Whether this filter would pass every task through unchanged.
    pub fn is_passthrough(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.tag.is_none()
            && self.text.as_deref().map_or(true, |text| text.trim().is_empty())
            && self.sort.is_none()
    }

    /// Checks the predicates against one task.
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        if let Some(tag) = self.tag.as_ref() {
            let needle = tag.trim().to_lowercase();
            if !task.tags.iter().any(|candidate| candidate == &needle) {
                return false;
            }
        }
        if let Some(text) = self.text.as_ref() {
            let needle = text.trim().to_lowercase();
            if !needle.is_empty() {
                let in_title = task.title.to_lowercase().contains(&needle);
                let in_description = task.description.to_lowercase().contains(&needle);
                if !in_title && !in_description {
                    return false;
                }
            }
        }
        true
    }

    /// Computes the derived view: matching tasks, sorted when a key is set.
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        let mut visible: Vec<Task> = tasks.iter().filter(|task| self.matches(task)).cloned().collect();

        if let Some(key) = self.sort {
            let descending = self.direction == SortDirection::Descending;
            visible.sort_by(|a, b| {
                let ordering = compare_by_key(a, b, key);
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        visible
    }
}

fn compare_by_key(a: &Task, b: &Task, key: SortKey) -> Ordering {
    match key {
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        SortKey::DueAt => match (a.due_at, b.due_at) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortKey::Priority => a.priority.rank().cmp(&b.priority.rank()),
        SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortKey::Status => a.status.rank().cmp(&b.status.rank()),
    }
}

#[cfg(test)]
mod tests {
    use super::{SortDirection, SortKey, TaskFilter};
    use crate::model::task::{Task, TaskPriority, TaskStatus};

    fn task(title: &str, priority: TaskPriority) -> Task {
        Task::new(title, priority)
    }

    #[test]
    fn default_filter_returns_snapshot_unchanged() {
        let tasks = vec![
            task("b", TaskPriority::Low),
            task("a", TaskPriority::Urgent),
            task("c", TaskPriority::Medium),
        ];
        let filter = TaskFilter::default();
        assert!(filter.is_passthrough());

        let visible = filter.apply(&tasks);
        let ids: Vec<_> = visible.iter().map(|t| t.id).collect();
        let expected: Vec<_> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn status_predicate_selects_exact_subset() {
        let mut done = task("done", TaskPriority::Low);
        done.status = TaskStatus::Completed;
        done.completed_at = Some(10);
        let open = task("open", TaskPriority::Low);
        let tasks = vec![done.clone(), open.clone()];

        let filter = TaskFilter {
            status: Some(TaskStatus::Completed),
            ..TaskFilter::default()
        };
        let visible = filter.apply(&tasks);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, done.id);
    }

    #[test]
    fn text_predicate_is_case_insensitive_over_title_and_description() {
        let mut noted = task("Plain title", TaskPriority::Low);
        noted.description = "remember the MILK run".to_string();
        let other = task("unrelated", TaskPriority::Low);
        let tasks = vec![noted.clone(), other];

        let filter = TaskFilter {
            text: Some("milk".to_string()),
            ..TaskFilter::default()
        };
        let visible = filter.apply(&tasks);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, noted.id);
    }

    #[test]
    fn priority_sort_descending_puts_urgent_first() {
        let tasks = vec![
            task("low", TaskPriority::Low),
            task("urgent", TaskPriority::Urgent),
            task("medium", TaskPriority::Medium),
        ];
        let filter = TaskFilter {
            sort: Some(SortKey::Priority),
            direction: SortDirection::Descending,
            ..TaskFilter::default()
        };
        let visible = filter.apply(&tasks);
        let titles: Vec<_> = visible.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["urgent", "medium", "low"]);
    }

    #[test]
    fn due_sort_places_undated_tasks_last() {
        let mut early = task("early", TaskPriority::Low);
        early.due_at = Some(100);
        let mut late = task("late", TaskPriority::Low);
        late.due_at = Some(900);
        let undated = task("undated", TaskPriority::Low);
        let tasks = vec![undated.clone(), late.clone(), early.clone()];

        let filter = TaskFilter {
            sort: Some(SortKey::DueAt),
            ..TaskFilter::default()
        };
        let visible = filter.apply(&tasks);
        let titles: Vec<_> = visible.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["early", "late", "undated"]);
    }

    #[test]
    fn title_sort_ignores_case() {
        let tasks = vec![
            task("banana", TaskPriority::Low),
            task("Apple", TaskPriority::Low),
            task("cherry", TaskPriority::Low),
        ];
        let filter = TaskFilter {
            sort: Some(SortKey::Title),
            ..TaskFilter::default()
        };
        let visible = filter.apply(&tasks);
        let titles: Vec<_> = visible.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn tag_predicate_matches_normalized_labels() {
        let mut tagged = task("tagged", TaskPriority::Low);
        tagged.set_tags(&["Errands".to_string()]);
        let plain = task("plain", TaskPriority::Low);
        let tasks = vec![tagged.clone(), plain];

        let filter = TaskFilter {
            tag: Some(" ERRANDS ".to_string()),
            ..TaskFilter::default()
        };
        let visible = filter.apply(&tasks);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, tagged.id);
    }
}
