//! JSON layout of the persisted task slot, including legacy shapes.
//!
//! # Invariants
//! - Writes always produce the current shape: an array of
//!   `{"id", "title", "completed"}` objects.
//! - Reads accept the current shape, bare title strings, and objects
//!   without `id`; the latter two receive fresh identifiers.
//! - Decoded ids are unique: a repeated id is replaced by a fresh one.
//! - A payload that is not a JSON array decodes to an empty, corrupted result.

use crate::model::task::{Task, TaskId};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

/// One array entry as found in the slot.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    /// Title-only format written before records existed.
    Title(String),
    Record(StoredRecord),
}

#[derive(Debug, Deserialize)]
struct StoredRecord {
    #[serde(default)]
    id: Option<TaskId>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    completed: bool,
}

/// Result of decoding one slot payload.
#[derive(Debug, Default)]
pub(crate) struct DecodedTasks {
    pub tasks: Vec<Task>,
    /// Entries rebuilt from a legacy shape or given a fresh id.
    pub migrated: usize,
    /// Entries with an unusable shape (numbers, nulls, non-string ids).
    pub dropped: usize,
    /// The payload was not a JSON array at all.
    pub corrupted: bool,
}

pub(crate) fn decode_tasks(payload: &str) -> DecodedTasks {
    let entries = match serde_json::from_str::<Vec<Value>>(payload) {
        Ok(entries) => entries,
        Err(_) => {
            return DecodedTasks {
                corrupted: true,
                ..DecodedTasks::default()
            };
        }
    };

    let mut decoded = DecodedTasks {
        tasks: Vec::with_capacity(entries.len()),
        ..DecodedTasks::default()
    };

    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        match serde_json::from_value::<StoredEntry>(entry) {
            Ok(StoredEntry::Title(title)) => {
                let task = Task::new(title, false);
                seen.insert(task.id.clone());
                decoded.tasks.push(task);
                decoded.migrated += 1;
            }
            Ok(StoredEntry::Record(StoredRecord {
                id: Some(id),
                title,
                completed,
            })) => {
                if seen.insert(id.clone()) {
                    decoded.tasks.push(Task::with_id(id, title, completed));
                } else {
                    let task = Task::new(title, completed);
                    seen.insert(task.id.clone());
                    decoded.tasks.push(task);
                    decoded.migrated += 1;
                }
            }
            Ok(StoredEntry::Record(StoredRecord {
                id: None,
                title,
                completed,
            })) => {
                let task = Task::new(title, completed);
                seen.insert(task.id.clone());
                decoded.tasks.push(task);
                decoded.migrated += 1;
            }
            Err(_) => decoded.dropped += 1,
        }
    }

    decoded
}

pub(crate) fn encode_tasks(tasks: &[Task]) -> serde_json::Result<String> {
    serde_json::to_string(tasks)
}

#[cfg(test)]
mod tests {
    use super::{decode_tasks, encode_tasks};
    use crate::model::task::{Task, TaskId};

    #[test]
    fn decodes_current_shape_without_migration() {
        let decoded = decode_tasks(
            r#"[{"id":"a1","title":"one","completed":true},{"id":"b2","title":"two","completed":false}]"#,
        );
        assert!(!decoded.corrupted);
        assert_eq!(decoded.migrated, 0);
        assert_eq!(
            decoded.tasks,
            vec![
                Task::with_id(TaskId::from("a1"), "one", true),
                Task::with_id(TaskId::from("b2"), "two", false),
            ]
        );
    }

    #[test]
    fn mixed_legacy_entries_are_migrated_in_place() {
        let decoded =
            decode_tasks(r#"["bare", {"title":"no id","completed":true}, {"id":"k","title":"ok"}]"#);
        assert_eq!(decoded.migrated, 2);
        assert_eq!(decoded.tasks.len(), 3);
        assert_eq!(decoded.tasks[0].title, "bare");
        assert!(!decoded.tasks[0].completed);
        assert_eq!(decoded.tasks[1].title, "no id");
        assert!(decoded.tasks[1].completed);
        assert_eq!(decoded.tasks[2].id, TaskId::from("k"));
        assert!(!decoded.tasks[2].completed);
    }

    #[test]
    fn repeated_id_gets_a_fresh_one() {
        let decoded = decode_tasks(
            r#"[{"id":"dup","title":"a","completed":false},{"id":"dup","title":"b","completed":true}]"#,
        );
        assert_eq!(decoded.migrated, 1);
        assert_eq!(decoded.tasks[0].id, TaskId::from("dup"));
        assert_ne!(decoded.tasks[1].id, TaskId::from("dup"));
        assert_eq!(decoded.tasks[1].title, "b");
        assert!(decoded.tasks[1].completed);
    }

    #[test]
    fn unusable_entries_are_dropped() {
        let decoded = decode_tasks(r#"[1, null, {"id": 7, "title": "x"}, "kept"]"#);
        assert_eq!(decoded.dropped, 3);
        assert_eq!(decoded.tasks.len(), 1);
        assert_eq!(decoded.tasks[0].title, "kept");
    }

    #[test]
    fn non_array_payload_is_corrupted() {
        assert!(decode_tasks("{not json").corrupted);
        assert!(decode_tasks(r#"{"id":"a"}"#).corrupted);
        assert!(decode_tasks("").corrupted);
    }

    #[test]
    fn encode_writes_current_shape() {
        let json = encode_tasks(&[Task::with_id(TaskId::from("z"), "t", false)]).unwrap();
        assert_eq!(json, r#"[{"id":"z","title":"t","completed":false}]"#);
    }
}
