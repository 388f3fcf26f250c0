//! Slot table schema and its upgrade steps.
//!
//! Step `n` in `UPGRADES` moves the file from version `n` to `n + 1`.

use super::{DbError, DbResult, SLOTS_TABLE};
use log::info;
use rusqlite::{Connection, OptionalExtension};

const UPGRADES: &[&str] = &[include_str!("sql/0001_slots.sql")];

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = UPGRADES.len() as u32;

/// Brings the slot schema up to `SCHEMA_VERSION` and checks the slot table.
pub fn upgrade_schema(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(DbError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    if found < SCHEMA_VERSION {
        let tx = conn.transaction()?;
        for sql in &UPGRADES[found as usize..] {
            tx.execute_batch(sql)?;
        }
        tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        tx.commit()?;
        info!(
            "event=db_migrate module=db status=ok from_version={} to_version={}",
            found, SCHEMA_VERSION
        );
    }

    if !has_slots_table(conn)? {
        return Err(DbError::MissingSlotsTable { version: found });
    }
    Ok(())
}

pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

fn has_slots_table(conn: &Connection) -> DbResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [SLOTS_TABLE],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}
