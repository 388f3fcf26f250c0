//! Durable key-value slot abstraction.
//!
//! # Responsibility
//! - Define the contract `TaskStore` persists through: one named text slot
//!   per collection, read and written whole.
//! - Keep backend details (SQLite, in-process map) behind one trait.
//!
//! # Invariants
//! - `write_slot` replaces the previous value atomically or fails without
//!   changing it.
//! - Reads of a never-written key return `Ok(None)`, not an error.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemorySlotStorage;
pub use sqlite::SqliteSlotStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure of the durable slot backend.
#[derive(Debug)]
pub enum StorageError {
    /// The write would exceed the backend's size quota.
    QuotaExceeded {
        key: String,
        requested: usize,
        limit: usize,
    },
    /// Storage is disabled or otherwise unusable.
    Unavailable(String),
    Db(DbError),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded {
                key,
                requested,
                limit,
            } => write!(
                f,
                "storage quota exceeded for slot `{key}`: {requested} bytes requested, limit {limit}"
            ),
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Named text slots with synchronous, whole-value reads and writes.
pub trait SlotStorage {
    fn read_slot(&self, key: &str) -> StorageResult<Option<String>>;
    fn write_slot(&mut self, key: &str, value: &str) -> StorageResult<()>;
}
