//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the task record and its identifier.
//! - Define the three list filter kinds used by traversal and rendering.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard removal from the collection; no tombstones are kept.

pub mod filter;
pub mod task;
