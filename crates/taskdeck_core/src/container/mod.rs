//! State container orchestration.
//!
//! # Responsibility
//! - Own the authoritative task snapshot and be its sole mutator.
//! - Convert repository failures into the snapshot's display-string error
//!   channel; nothing is rethrown past this layer.
//!
//! # Invariants
//! - Optimistic writes are two-phase: tentative apply, then confirm or
//!   compensate.
//! - Every snapshot change bumps the revision and notifies subscribers.

pub mod optimistic;
pub mod task_list;
