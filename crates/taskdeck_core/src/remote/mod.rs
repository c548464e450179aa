//! Remote data-source implementations.
//!
//! # Responsibility
//! - Translate the task record to and from wire representations.
//! - Perform the HTTP I/O behind the repository contract.

pub mod http_repo;
