//! Task repository over the key-value boundary.
//!
//! # Responsibility
//! - Persist each task as a JSON blob under its own key.
//! - Maintain an insertion-ordered ID index blob for listing.
//!
//! # Invariants
//! - Index entries and task blobs are kept in step by every write path.
//! - The index defines list order; it never references a missing blob in a
//!   healthy store.

use crate::kv::{KeyValueStore, KvError};
use crate::model::task::{normalize_tags, Task, TaskId};
use crate::repo::task_repo::{
    apply_page, matches_query, RepoError, RepoResult, TaskListQuery, TaskRepository,
};
use uuid::Uuid;

const TASK_KEY_PREFIX: &str = "task/";
const INDEX_KEY: &str = "task_index";

impl From<KvError> for RepoError {
    fn from(value: KvError) -> Self {
        match value {
            KvError::Db(err) => Self::Db(err),
            KvError::MissingRequiredTable(table) => Self::MissingRequiredTable(table),
        }
    }
}

/// Task repository storing JSON blobs in a [`KeyValueStore`].
pub struct KvTaskRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvTaskRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Consumes the repository and returns the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn task_key(id: TaskId) -> String {
        format!("{TASK_KEY_PREFIX}{id}")
    }

    fn load_index(&self) -> RepoResult<Vec<TaskId>> {
        let Some(raw) = self.store.get(INDEX_KEY)? else {
            return Ok(Vec::new());
        };
        let entries: Vec<String> = serde_json::from_str(&raw)
            .map_err(|err| RepoError::InvalidData(format!("corrupt task index: {err}")))?;

        let mut ids = Vec::with_capacity(entries.len());
        for entry in entries {
            let id = Uuid::parse_str(&entry).map_err(|_| {
                RepoError::InvalidData(format!("invalid uuid `{entry}` in task index"))
            })?;
            ids.push(id);
        }
        Ok(ids)
    }

    fn save_index(&mut self, ids: &[TaskId]) -> RepoResult<()> {
        let entries: Vec<String> = ids.iter().map(TaskId::to_string).collect();
        let raw = serde_json::to_string(&entries)
            .map_err(|err| RepoError::InvalidData(format!("unencodable task index: {err}")))?;
        self.store.set(INDEX_KEY, &raw)?;
        Ok(())
    }

    fn load_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let Some(raw) = self.store.get(&Self::task_key(id))? else {
            return Ok(None);
        };
        let task: Task = serde_json::from_str(&raw)
            .map_err(|err| RepoError::InvalidData(format!("corrupt task blob for {id}: {err}")))?;
        task.validate()?;
        Ok(Some(task))
    }

    fn save_task(&mut self, task: &Task) -> RepoResult<()> {
        let raw = serde_json::to_string(task).map_err(|err| {
            RepoError::InvalidData(format!("unencodable task blob for {}: {err}", task.id))
        })?;
        self.store.set(&Self::task_key(task.id), &raw)?;
        Ok(())
    }
}

impl<S: KeyValueStore> TaskRepository for KvTaskRepository<S> {
    fn create_task(&mut self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        let mut index = self.load_index()?;
        if index.contains(&task.id) {
            return Err(RepoError::InvalidData(format!(
                "duplicate task id {}",
                task.id
            )));
        }

        let mut stored = task.clone();
        stored.tags = normalize_tags(&stored.tags);
        self.save_task(&stored)?;
        index.push(task.id);
        self.save_index(&index)?;
        Ok(task.id)
    }

    fn update_task(&mut self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        if self.load_task(task.id)?.is_none() {
            return Err(RepoError::NotFound(task.id));
        }

        let mut stored = task.clone();
        stored.tags = normalize_tags(&stored.tags);
        self.save_task(&stored)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.load_task(id)
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let index = self.load_index()?;
        let mut matching = Vec::new();
        for id in index {
            let task = self.load_task(id)?.ok_or_else(|| {
                RepoError::InvalidData(format!("task index references missing blob {id}"))
            })?;
            if matches_query(&task, query) {
                matching.push(task);
            }
        }
        Ok(apply_page(matching, query))
    }

    fn delete_task(&mut self, id: TaskId) -> RepoResult<bool> {
        let mut index = self.load_index()?;
        let before = index.len();
        index.retain(|entry| *entry != id);
        if index.len() == before {
            return Ok(false);
        }

        self.save_index(&index)?;
        self.store.delete(&Self::task_key(id))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::KvTaskRepository;
    use crate::kv::MemoryKvStore;
    use crate::model::task::{Task, TaskPriority};
    use crate::repo::task_repo::{RepoError, TaskListQuery, TaskRepository};

    fn repo() -> KvTaskRepository<MemoryKvStore> {
        KvTaskRepository::new(MemoryKvStore::new())
    }

    #[test]
    fn create_then_get_roundtrip() {
        let mut repo = repo();
        let mut task = Task::new("pack boxes", TaskPriority::High);
        task.set_tags(&["Moving".to_string()]);
        repo.create_task(&task).unwrap();

        let loaded = repo.get_task(task.id).unwrap().unwrap();
        assert_eq!(loaded.title, "pack boxes");
        assert_eq!(loaded.tags, vec!["moving"]);
    }

    #[test]
    fn list_follows_index_insertion_order() {
        let mut repo = repo();
        let first = Task::new("first", TaskPriority::Low);
        let second = Task::new("second", TaskPriority::Low);
        repo.create_task(&first).unwrap();
        repo.create_task(&second).unwrap();

        let listed = repo.list_tasks(&TaskListQuery::default()).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[1].id, second.id);
    }

    #[test]
    fn delete_is_idempotent_and_drops_the_blob() {
        let mut repo = repo();
        let task = Task::new("discard", TaskPriority::Medium);
        repo.create_task(&task).unwrap();

        assert!(repo.delete_task(task.id).unwrap());
        assert!(repo.get_task(task.id).unwrap().is_none());
        assert!(!repo.delete_task(task.id).unwrap());
    }

    #[test]
    fn update_missing_task_reports_not_found() {
        let mut repo = repo();
        let task = Task::new("ghost", TaskPriority::Medium);
        let err = repo.update_task(&task).unwrap_err();
        assert!(matches!(err, RepoError::NotFound(id) if id == task.id));
    }

    #[test]
    fn corrupt_index_surfaces_invalid_data() {
        use crate::kv::KeyValueStore;

        let mut store = MemoryKvStore::new();
        store.set("task_index", "not json").unwrap();
        let repo = KvTaskRepository::new(store);
        let err = repo.list_tasks(&TaskListQuery::default()).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)));
    }
}
