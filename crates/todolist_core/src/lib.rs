//! Core task-list logic: the task collection, its durable slot, and a
//! headless view that turns UI input into collection changes.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod storage;
pub mod store;
pub mod view;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::filter::TaskFilter;
pub use model::task::{Task, TaskId};
pub use storage::{MemorySlotStorage, SlotStorage, SqliteSlotStorage, StorageError, StorageResult};
pub use store::task_store::{
    ChangeOutcome, LoadReport, StoreError, StoreResult, TaskStore, DEFAULT_STORAGE_KEY,
};
pub use view::render_model::{FilterLink, FooterView, ItemView, RenderModel};
pub use view::todo_view::{EventOutcome, EventReport, Key, Renderer, TodoView, UiEvent};

/// Minimal health-check API used by the CLI probe.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
