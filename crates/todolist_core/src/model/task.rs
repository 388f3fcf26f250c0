//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical to-do record stored by `TaskStore`.
//! - Generate opaque, collision-resistant task identifiers.
//!
//! # Invariants
//! - `id` is assigned at creation and never changes afterwards.
//! - `id` is the only equality/lookup key used by the store.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque task identifier.
///
/// Stored as plain text so identifiers written by older clients (which may
/// not be UUIDs) survive a load/save cycle unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a fresh random identifier (UUID v4, hyphenated lowercase).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Single to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identifier used for lookup and equality.
    pub id: TaskId,
    /// Display text. Updating it to empty text deletes the task instead.
    pub title: String,
    pub completed: bool,
}

impl Task {
    /// Creates a task with a freshly generated identifier.
    pub fn new(title: impl Into<String>, completed: bool) -> Self {
        Self::with_id(TaskId::generate(), title, completed)
    }

    /// Creates a task with a caller-provided identifier.
    ///
    /// Used when restoring persisted records whose identity already exists.
    pub fn with_id(id: TaskId, title: impl Into<String>, completed: bool) -> Self {
        Self {
            id,
            title: title.into(),
            completed,
        }
    }
}
