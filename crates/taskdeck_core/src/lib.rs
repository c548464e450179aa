//! Core domain logic for taskdeck.
//! This crate is the single source of truth for business invariants.

pub mod container;
pub mod db;
pub mod events;
pub mod filter;
pub mod kv;
pub mod logging;
pub mod model;
pub mod refresh;
pub mod remote;
pub mod repo;

pub use container::optimistic::{revert, AppliedChange};
pub use container::task_list::{TaskDraft, TaskListContainer, TaskListState};
pub use events::{payload, EventBus, EventPayload};
pub use filter::{SortDirection, SortKey, TaskFilter};
pub use kv::{KeyValueStore, KvError, KvResult, MemoryKvStore, SqliteKvStore};
pub use logging::{default_log_level, init_logging, logging_status, LoggingInitError};
pub use model::task::{
    normalize_tag, normalize_tags, now_epoch_ms, Task, TaskId, TaskPriority, TaskStatus,
    TaskValidationError,
};
pub use model::transition::{advance, apply_toggle, CompletionEffect, StatusTransition};
pub use refresh::RefreshScheduler;
pub use remote::http_repo::HttpTaskRepository;
pub use repo::kv_repo::KvTaskRepository;
pub use repo::memory_repo::MemoryTaskRepository;
pub use repo::task_repo::{
    RepoError, RepoResult, SqliteTaskRepository, TaskListQuery, TaskRepository,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
