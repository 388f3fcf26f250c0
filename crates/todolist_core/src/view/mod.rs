//! Presentation boundary.
//!
//! # Responsibility
//! - Translate UI input into store operations.
//! - Produce renderer-agnostic snapshots of the filtered list and footer.
//!
//! Concrete surfaces (terminal, DOM bindings) implement `Renderer` outside
//! this crate.

pub mod render_model;
pub mod todo_view;
