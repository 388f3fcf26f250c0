//! Task collection service.
//!
//! # Responsibility
//! - Provide the only mutation path for tasks.
//! - Keep the persisted slot and observers consistent with memory.

mod codec;
pub mod task_store;
