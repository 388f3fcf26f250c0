//! Task collection with write-through persistence and change notification.
//!
//! # Responsibility
//! - Own the ordered task list; every mutation goes through this type.
//! - Write the full list to one storage slot after every applied mutation.
//! - Notify registered observers after every applied mutation and after load.
//!
//! # Invariants
//! - Task ids are unique within one store.
//! - Order of operations per mutation: memory, slot write, observers, return.
//! - A failed slot write leaves the in-memory change applied and still
//!   notifies observers; the failure is returned to the caller.
//! - Operations on an unknown id change nothing: no write, no notification.
//! - Observers must not mutate the store they observe. Plain closures cannot
//!   reach it during notification; shared handles (`Rc<RefCell<_>>`) panic
//!   on the nested borrow.

use crate::model::filter::TaskFilter;
use crate::model::task::{Task, TaskId};
use crate::storage::{SlotStorage, StorageError};
use crate::store::codec::{decode_tasks, encode_tasks};
use log::{debug, error, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "todo-list";

pub type StoreResult<T> = Result<T, StoreError>;

type Observer = Box<dyn FnMut()>;

/// Error returned by mutating store operations.
#[derive(Debug)]
pub enum StoreError {
    /// The slot write failed; the in-memory change was kept.
    Persistence {
        source: StorageError,
        /// Task created by the failed call; it exists in memory.
        created: Option<TaskId>,
    },
    /// The task list could not be serialized.
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persistence { source, .. } => write!(f, "failed to persist tasks: {source}"),
            Self::Encode(err) => write!(f, "failed to encode tasks: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Persistence {
            source: value,
            created: None,
        }
    }
}

impl StoreError {
    /// Id of the task a failed `add` still created in memory.
    pub fn created_task(&self) -> Option<&TaskId> {
        match self {
            Self::Persistence { created, .. } => created.as_ref(),
            Self::Encode(_) => None,
        }
    }

    fn with_created(self, id: TaskId) -> Self {
        match self {
            Self::Persistence { source, .. } => Self::Persistence {
                source,
                created: Some(id),
            },
            other => other,
        }
    }
}

/// Whether an id-addressed mutation found its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    Applied,
    NotFound,
}

impl ChangeOutcome {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

/// Summary of one `load()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Tasks present after loading.
    pub loaded: usize,
    /// Entries rebuilt from legacy shapes or re-keyed because their id repeated.
    pub migrated: usize,
    /// Entries discarded because their shape was unusable.
    pub dropped: usize,
    /// The slot held unreadable data and the list started empty.
    pub recovered_from_corruption: bool,
}

/// Single source of truth for the task list.
pub struct TaskStore<S: SlotStorage> {
    tasks: Vec<Task>,
    observers: Vec<Observer>,
    storage: S,
    key: String,
}

impl<S: SlotStorage> TaskStore<S> {
    /// Creates an empty, not-yet-loaded store using `DEFAULT_STORAGE_KEY`.
    ///
    /// Register observers, then call `load()` so they see the initial state.
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            tasks: Vec::new(),
            observers: Vec::new(),
            storage,
            key: key.into(),
        }
    }

    /// Creates a store and loads the persisted list.
    ///
    /// A failed write-back of migrated entries is logged and otherwise
    /// ignored: the loaded tasks stay in memory and are written again by the
    /// next mutation. Use `new` + `load` to observe that failure.
    pub fn open(storage: S) -> Self {
        Self::open_with_key(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn open_with_key(storage: S, key: impl Into<String>) -> Self {
        let mut store = Self::with_key(storage, key);
        if let Err(err) = store.load() {
            warn!(
                "event=store_open module=store status=degraded key={} count={} error={}",
                store.key,
                store.tasks.len(),
                err
            );
        }
        store
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Replaces the in-memory list with the persisted one.
    ///
    /// Missing, unreadable, or non-array slot data yields an empty list.
    /// When legacy entries were migrated the rebuilt list is written back so
    /// the new ids stay stable; only that write can fail this call. Observers
    /// are notified exactly once in every case.
    pub fn load(&mut self) -> StoreResult<LoadReport> {
        let mut report = LoadReport::default();

        let payload = match self.storage.read_slot(&self.key) {
            Ok(payload) => payload,
            Err(err) => {
                error!(
                    "event=store_load module=store status=error key={} error={}",
                    self.key, err
                );
                None
            }
        };

        self.tasks = match payload {
            None => Vec::new(),
            Some(payload) => {
                let decoded = decode_tasks(&payload);
                if decoded.corrupted {
                    warn!(
                        "event=store_load module=store status=recovered key={} reason=malformed_payload bytes={}",
                        self.key,
                        payload.len()
                    );
                }
                if decoded.dropped > 0 {
                    warn!(
                        "event=store_load module=store status=partial key={} dropped={}",
                        self.key, decoded.dropped
                    );
                }
                report.migrated = decoded.migrated;
                report.dropped = decoded.dropped;
                report.recovered_from_corruption = decoded.corrupted;
                decoded.tasks
            }
        };
        report.loaded = self.tasks.len();

        let persisted = if report.migrated > 0 {
            self.write_slot()
        } else {
            Ok(())
        };

        debug!(
            "event=store_load module=store status=ok key={} count={} migrated={}",
            self.key, report.loaded, report.migrated
        );
        self.notify();
        persisted.map(|()| report)
    }

    /// Appends a new, incomplete task and returns its id.
    ///
    /// Empty titles are accepted; rejecting blank input is the caller's job.
    /// On a failed write the task is kept and its id is available through
    /// `StoreError::created_task`.
    pub fn add(&mut self, title: impl Into<String>) -> StoreResult<TaskId> {
        let task = Task::new(title, false);
        let id = task.id.clone();
        self.tasks.push(task);
        self.commit("add")
            .map_err(|err| err.with_created(id.clone()))?;
        Ok(id)
    }

    /// Sets the title of `id`; empty `text` removes the task instead.
    pub fn update_title(&mut self, id: &TaskId, text: &str) -> StoreResult<ChangeOutcome> {
        if text.is_empty() {
            return self.destroy(id);
        }
        let Some(task) = self.task_mut(id) else {
            return Ok(ChangeOutcome::NotFound);
        };
        task.title = text.to_string();
        self.commit("update_title")?;
        Ok(ChangeOutcome::Applied)
    }

    pub fn update_completed(&mut self, id: &TaskId, completed: bool) -> StoreResult<ChangeOutcome> {
        let Some(task) = self.task_mut(id) else {
            return Ok(ChangeOutcome::NotFound);
        };
        task.completed = completed;
        self.commit("update_completed")?;
        Ok(ChangeOutcome::Applied)
    }

    pub fn destroy(&mut self, id: &TaskId) -> StoreResult<ChangeOutcome> {
        let Some(index) = self.index_of(id) else {
            return Ok(ChangeOutcome::NotFound);
        };
        self.tasks.remove(index);
        self.commit("destroy")?;
        Ok(ChangeOutcome::Applied)
    }

    /// Sets every task's flag in one batch: one write, one notification.
    pub fn toggle_all(&mut self, completed: bool) -> StoreResult<()> {
        for task in &mut self.tasks {
            task.completed = completed;
        }
        self.commit("toggle_all")
    }

    /// Removes all completed tasks, keeping the rest in order.
    ///
    /// Returns how many tasks were removed.
    pub fn clear_completed(&mut self) -> StoreResult<usize> {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        let removed = before - self.tasks.len();
        self.commit("clear_completed")?;
        Ok(removed)
    }

    pub fn size(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    pub fn incomplete_count(&self) -> usize {
        self.size() - self.completed_count()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn index_of(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| &task.id == id)
    }

    /// Tasks in display order. Each call starts a fresh traversal.
    pub fn iter(&self) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter()
    }

    pub fn iter_filtered(&self, filter: TaskFilter) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter().filter(move |task| filter.matches(task))
    }

    pub fn for_each(&self, visitor: impl FnMut(&Task)) {
        self.iter().for_each(visitor);
    }

    pub fn for_each_filtered(&self, filter: TaskFilter, visitor: impl FnMut(&Task)) {
        self.iter_filtered(filter).for_each(visitor);
    }

    /// Like `for_each_filtered`, taking a raw token; unknown tokens mean `all`.
    pub fn for_each_filtered_kind(&self, kind: &str, visitor: impl FnMut(&Task)) {
        self.for_each_filtered(TaskFilter::from_token_or_all(kind), visitor);
    }

    /// Registers a callback run after every applied mutation and after load.
    pub fn on_change(&mut self, callback: impl FnMut() + 'static) {
        self.observers.push(Box::new(callback));
    }

    fn task_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| &task.id == id)
    }

    fn commit(&mut self, op: &'static str) -> StoreResult<()> {
        let persisted = self.write_slot();
        match &persisted {
            Ok(()) => debug!(
                "event={} module=store status=ok key={} count={}",
                op,
                self.key,
                self.tasks.len()
            ),
            Err(err) => warn!(
                "event={} module=store status=error key={} count={} error={}",
                op,
                self.key,
                self.tasks.len(),
                err
            ),
        }
        self.notify();
        persisted
    }

    fn write_slot(&mut self) -> StoreResult<()> {
        let payload = encode_tasks(&self.tasks).map_err(StoreError::Encode)?;
        self.storage.write_slot(&self.key, &payload)?;
        Ok(())
    }

    fn notify(&mut self) {
        for observer in &mut self.observers {
            observer();
        }
    }
}
