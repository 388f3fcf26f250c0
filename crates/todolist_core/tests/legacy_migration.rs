use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;
use todolist_core::{LoadReport, MemorySlotStorage, SlotStorage, TaskId, TaskStore};

fn seeded(payload: &str) -> MemorySlotStorage {
    MemorySlotStorage::new().with_slot("todo-list", payload)
}

#[test]
fn bare_strings_become_incomplete_tasks_with_fresh_ids() {
    let mut store = TaskStore::new(seeded(r#"["a","b"]"#));
    let report = store.load().unwrap();

    assert_eq!(report.loaded, 2);
    assert_eq!(report.migrated, 2);
    let tasks = store.iter().collect::<Vec<_>>();
    assert_eq!(tasks[0].title, "a");
    assert_eq!(tasks[1].title, "b");
    assert!(tasks.iter().all(|task| !task.completed));
    let ids = tasks
        .iter()
        .map(|task| task.id.clone())
        .collect::<HashSet<_>>();
    assert_eq!(ids.len(), 2);
}

#[test]
fn records_without_id_keep_title_and_flag() {
    let mut store = TaskStore::new(seeded(
        r#"[{"title":"old","completed":true},{"title":"older","completed":false}]"#,
    ));
    store.load().unwrap();

    let tasks = store.iter().collect::<Vec<_>>();
    assert_eq!(tasks.len(), 2);
    assert_eq!((tasks[0].title.as_str(), tasks[0].completed), ("old", true));
    assert_eq!(
        (tasks[1].title.as_str(), tasks[1].completed),
        ("older", false)
    );
    assert_ne!(tasks[0].id, tasks[1].id);
}

#[test]
fn migrated_ids_are_written_back_and_stable() {
    let mut store = TaskStore::new(seeded(r#"["only"]"#));
    store.load().unwrap();
    let id = store.iter().next().unwrap().id.clone();

    let rewritten = store.storage().read_slot("todo-list").unwrap().unwrap();
    assert!(rewritten.contains(id.as_str()));

    let reopened = TaskStore::open(seeded(&rewritten));
    assert_eq!(reopened.iter().next().unwrap().id, id);
}

#[test]
fn well_formed_data_is_not_rewritten() {
    let payload = r#"[{"id":"fixed-id","title":"stay","completed":false}]"#;
    let mut store = TaskStore::new(seeded(payload));
    let report = store.load().unwrap();

    assert_eq!(report.migrated, 0);
    assert_eq!(store.storage().write_count(), 0);
    assert!(store.get(&TaskId::from("fixed-id")).is_some());
}

#[test]
fn malformed_payload_fails_closed_to_empty() {
    let mut store = TaskStore::new(seeded("{{ definitely not json"));
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    store.on_change(move || seen.set(seen.get() + 1));

    let report = store.load().unwrap();
    assert_eq!(
        report,
        LoadReport {
            loaded: 0,
            migrated: 0,
            dropped: 0,
            recovered_from_corruption: true,
        }
    );
    assert_eq!(store.size(), 0);
    assert_eq!(calls.get(), 1);
}

#[test]
fn migration_write_failure_keeps_loaded_tasks() {
    let storage = MemorySlotStorage::with_quota(4).with_slot("todo-list", r#"["a"]"#);
    let mut store = TaskStore::new(storage);

    assert!(store.load().is_err());
    assert_eq!(store.size(), 1);
    assert_eq!(store.iter().next().unwrap().title, "a");
}

#[test]
fn open_keeps_tasks_when_write_back_fails() {
    let storage = MemorySlotStorage::with_quota(4).with_slot("todo-list", r#"["a"]"#);
    let store = TaskStore::open(storage);

    assert_eq!(store.size(), 1);
    assert_eq!(store.iter().next().unwrap().title, "a");
    assert_eq!(store.storage().slot("todo-list"), Some(r#"["a"]"#));
}

#[test]
fn repeated_ids_are_rekeyed_so_destroy_hits_one_task() {
    let payload = r#"[{"id":"dup","title":"first","completed":false},{"id":"dup","title":"second","completed":true}]"#;
    let mut store = TaskStore::new(seeded(payload));
    let report = store.load().unwrap();

    assert_eq!(report.loaded, 2);
    assert_eq!(report.migrated, 1);
    let ids = store
        .iter()
        .map(|task| task.id.clone())
        .collect::<HashSet<_>>();
    assert_eq!(ids.len(), 2);
    assert_eq!(store.storage().write_count(), 1);

    store.destroy(&TaskId::from("dup")).unwrap();
    assert!(store.get(&TaskId::from("dup")).is_none());
    assert_eq!(store.size(), 1);
    assert_eq!(store.iter().next().unwrap().title, "second");
}
