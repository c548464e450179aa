//! In-memory task repository.
//!
//! # Responsibility
//! - Provide a dependency-injected in-process store for sample data and
//!   tests, constructed at startup and passed to its consumers.
//! - Offer failure injection so callers can exercise rollback paths.
//!
//! # Invariants
//! - Insertion order is preserved and defines the list order.
//! - The handle is cheap to clone; clones share one backing store.

use crate::model::task::{normalize_tags, Task, TaskId};
use crate::repo::task_repo::{
    apply_page, matches_query, RepoError, RepoResult, TaskListQuery, TaskRepository,
};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
struct MemoryBackend {
    tasks: Vec<Task>,
    /// While set, every repository operation fails with this message.
    failure: Option<String>,
}

/// Shared-handle in-memory repository.
///
/// Replaces process-wide static sample stores: the owning scope constructs
/// one, keeps a clone for inspection, and hands another to the container.
#[derive(Clone, Default)]
pub struct MemoryTaskRepository {
    inner: Arc<Mutex<MemoryBackend>>,
}

impl MemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given sample tasks.
    ///
    /// Invalid samples are rejected so seeded state always satisfies the
    /// model invariants.
    pub fn with_samples(samples: Vec<Task>) -> RepoResult<Self> {
        let repo = Self::new();
        {
            let mut backend = repo.inner.lock();
            for mut task in samples {
                task.tags = normalize_tags(&task.tags);
                task.validate()?;
                backend.tasks.push(task);
            }
        }
        Ok(repo)
    }

    /// Makes every subsequent repository operation fail with `message`.
    ///
    /// Pass `None` to restore normal behavior.
    pub fn set_failure(&self, message: Option<&str>) {
        self.inner.lock().failure = message.map(str::to_string);
    }

    /// Number of stored tasks, bypassing query filtering.
    pub fn len(&self) -> usize {
        self.inner.lock().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().tasks.is_empty()
    }

    fn check_available(backend: &MemoryBackend) -> RepoResult<()> {
        match backend.failure.as_ref() {
            Some(message) => Err(RepoError::Transport(message.clone())),
            None => Ok(()),
        }
    }
}

impl TaskRepository for MemoryTaskRepository {
    fn create_task(&mut self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        let mut backend = self.inner.lock();
        Self::check_available(&backend)?;
        if backend.tasks.iter().any(|existing| existing.id == task.id) {
            return Err(RepoError::InvalidData(format!(
                "duplicate task id {}",
                task.id
            )));
        }

        let mut stored = task.clone();
        stored.tags = normalize_tags(&stored.tags);
        backend.tasks.push(stored);
        Ok(task.id)
    }

    fn update_task(&mut self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let mut backend = self.inner.lock();
        Self::check_available(&backend)?;
        let Some(slot) = backend
            .tasks
            .iter_mut()
            .find(|existing| existing.id == task.id)
        else {
            return Err(RepoError::NotFound(task.id));
        };

        let mut stored = task.clone();
        stored.tags = normalize_tags(&stored.tags);
        *slot = stored;
        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let backend = self.inner.lock();
        Self::check_available(&backend)?;
        Ok(backend.tasks.iter().find(|task| task.id == id).cloned())
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let backend = self.inner.lock();
        Self::check_available(&backend)?;
        let matching = backend
            .tasks
            .iter()
            .filter(|task| matches_query(task, query))
            .cloned()
            .collect();
        Ok(apply_page(matching, query))
    }

    fn delete_task(&mut self, id: TaskId) -> RepoResult<bool> {
        let mut backend = self.inner.lock();
        Self::check_available(&backend)?;
        let before = backend.tasks.len();
        backend.tasks.retain(|task| task.id != id);
        Ok(backend.tasks.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryTaskRepository;
    use crate::model::task::{Task, TaskPriority, TaskStatus};
    use crate::repo::task_repo::{RepoError, TaskListQuery, TaskRepository};

    fn sample(title: &str) -> Task {
        Task::new(title, TaskPriority::Medium)
    }

    #[test]
    fn preserves_insertion_order() {
        let mut repo = MemoryTaskRepository::new();
        let first = sample("first");
        let second = sample("second");
        repo.create_task(&first).unwrap();
        repo.create_task(&second).unwrap();

        let listed = repo.list_tasks(&TaskListQuery::default()).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[1].id, second.id);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut repo = MemoryTaskRepository::new();
        let task = sample("once");
        repo.create_task(&task).unwrap();
        let err = repo.create_task(&task).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)));
    }

    #[test]
    fn failure_switch_blocks_operations_until_cleared() {
        let mut repo = MemoryTaskRepository::new();
        repo.set_failure(Some("backend offline"));

        let task = sample("blocked");
        let err = repo.create_task(&task).unwrap_err();
        assert!(matches!(err, RepoError::Transport(message) if message == "backend offline"));

        assert!(matches!(
            repo.list_tasks(&TaskListQuery::default()).unwrap_err(),
            RepoError::Transport(_)
        ));

        repo.set_failure(None);
        repo.create_task(&task).unwrap();
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn clones_share_the_backing_store() {
        let mut repo = MemoryTaskRepository::new();
        let observer = repo.clone();
        repo.create_task(&sample("shared")).unwrap();
        assert_eq!(observer.len(), 1);
    }

    #[test]
    fn filters_by_status_and_tag() {
        let mut repo = MemoryTaskRepository::new();
        let mut tagged = sample("tagged");
        tagged.set_tags(&["Home".to_string()]);
        let mut done = sample("done");
        done.status = TaskStatus::Completed;
        done.completed_at = Some(1);
        repo.create_task(&tagged).unwrap();
        repo.create_task(&done).unwrap();

        let by_tag = repo
            .list_tasks(&TaskListQuery {
                tag: Some("home".to_string()),
                ..TaskListQuery::default()
            })
            .unwrap();
        assert_eq!(by_tag.len(), 1);
        assert_eq!(by_tag[0].id, tagged.id);

        let by_status = repo
            .list_tasks(&TaskListQuery {
                status: Some(TaskStatus::Completed),
                ..TaskListQuery::default()
            })
            .unwrap();
        assert_eq!(by_status.len(), 1);
        assert_eq!(by_status[0].id, done.id);
    }
}
