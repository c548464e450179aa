//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the task data-access contract shared by every backend.
//! - Isolate storage and transport details from container orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Task::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   storage transport errors.
//! - `delete_task` is idempotent: deleting an absent ID reports `false`
//!   instead of failing.

pub mod kv_repo;
pub mod memory_repo;
pub mod task_repo;
