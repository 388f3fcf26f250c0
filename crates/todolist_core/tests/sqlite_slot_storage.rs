use rusqlite::Connection;
use todolist_core::db::schema::SCHEMA_VERSION;
use todolist_core::db::{open_db, open_db_in_memory, DbError, SLOTS_TABLE};
use todolist_core::{SlotStorage, SqliteSlotStorage, StorageError, TaskStore};

#[test]
fn open_db_in_memory_creates_current_slot_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    assert_table_exists(&conn, SLOTS_TABLE);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = SqliteSlotStorage::open(&path).err().unwrap();
    assert!(matches!(err, StorageError::Db(_)));
}

#[test]
fn current_version_without_slot_table_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stripped.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))
        .unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::MissingSlotsTable { version } => assert_eq!(version, SCHEMA_VERSION),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn reopening_current_file_keeps_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.sqlite3");

    drop(open_db(&path).unwrap());
    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
}

#[test]
fn slot_write_upserts_single_row() {
    let mut storage = SqliteSlotStorage::open_in_memory().unwrap();
    assert_eq!(storage.read_slot("todo-list").unwrap(), None);

    storage.write_slot("todo-list", "[]").unwrap();
    storage.write_slot("todo-list", r#"["a"]"#).unwrap();

    assert_eq!(
        storage.read_slot("todo-list").unwrap().as_deref(),
        Some(r#"["a"]"#)
    );
    let rows: i64 = storage
        .connection()
        .query_row("SELECT COUNT(*) FROM slots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn task_list_survives_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.sqlite3");

    let (first, second) = {
        let mut store = TaskStore::open(SqliteSlotStorage::open(&path).unwrap());
        let first = store.add("persisted").unwrap();
        let second = store.add("also persisted").unwrap();
        store.update_completed(&second, true).unwrap();
        (first, second)
    };

    let store = TaskStore::open(SqliteSlotStorage::open(&path).unwrap());
    assert_eq!(store.size(), 2);
    assert_eq!(store.get(&first).unwrap().title, "persisted");
    assert!(store.get(&second).unwrap().completed);
}

#[test]
fn separate_keys_hold_separate_lists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.sqlite3");

    {
        let mut work = TaskStore::open_with_key(SqliteSlotStorage::open(&path).unwrap(), "work");
        work.add("report").unwrap();
    }

    let home = TaskStore::open_with_key(SqliteSlotStorage::open(&path).unwrap(), "home");
    assert_eq!(home.size(), 0);
    let work = TaskStore::open_with_key(SqliteSlotStorage::open(&path).unwrap(), "work");
    assert_eq!(work.size(), 1);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
