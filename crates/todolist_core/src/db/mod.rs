//! SQLite file backing the durable task slots.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`.
//! - A connection handed out by `open_db*` has the `slots` table in place.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

/// Table holding one row per slot key.
pub const SLOTS_TABLE: &str = "slots";

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build with a different slot layout.
    SchemaTooNew { found: u32, supported: u32 },
    /// The schema version claims to be current but the slot table is absent.
    MissingSlotsTable { version: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "slot database schema {found} is newer than supported {supported}"
            ),
            Self::MissingSlotsTable { version } => write!(
                f,
                "slot database at schema {version} has no `{SLOTS_TABLE}` table"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
