//! Headless presenter translating UI input into store calls.
//!
//! # Responsibility
//! - Map raw input events onto `TaskStore` operations.
//! - Track the selected filter and the row being edited.
//! - Re-render through a `Renderer` after store notifications.
//!
//! # Invariants
//! - The view never edits task fields directly; all changes go through the
//!   store so persistence and notification stay consistent.
//! - Blank new-item input is rejected here, not in the store.
//! - The store observer only flags the view dirty; rendering happens after
//!   the mutating call has returned.
//! - The edited row always exists in the store; edit mode ends when the row
//!   is removed by any other event.

use crate::model::filter::TaskFilter;
use crate::model::task::TaskId;
use crate::storage::SlotStorage;
use crate::store::task_store::{LoadReport, StoreError, StoreResult, TaskStore};
use crate::view::render_model::RenderModel;
use log::debug;
use std::cell::Cell;
use std::rc::Rc;

/// Rendering surface observed by the view.
pub trait Renderer {
    fn render(&mut self, model: &RenderModel);
}

impl<F: FnMut(&RenderModel)> Renderer for F {
    fn render(&mut self, model: &RenderModel) {
        self(model)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

/// Raw input events coming from the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Key pressed in the new-item field, with the field's current text.
    NewTodoKey { key: Key, text: String },
    CheckboxChanged { id: TaskId, checked: bool },
    LabelDoubleClicked { id: TaskId },
    /// Key pressed in a row's edit field.
    EditKey { id: TaskId, key: Key, text: String },
    EditBlurred { id: TaskId, text: String },
    DeleteClicked { id: TaskId },
    ToggleAllChanged { checked: bool },
    ClearCompletedClicked,
    /// Location fragment changed, e.g. `#active`.
    FragmentChanged { fragment: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Nothing to do for this input.
    Ignored,
    Handled,
    /// A task was created; the new-item field should be cleared.
    TodoAdded(TaskId),
}

/// What one handled event did, plus the store error it hit, if any.
///
/// A failed slot write still leaves the in-memory change applied, so the
/// outcome is reported next to the error: a failed add is still a
/// `TodoAdded` and the new-item field should be cleared.
#[derive(Debug)]
#[must_use]
pub struct EventReport {
    pub outcome: EventOutcome,
    pub error: Option<StoreError>,
}

impl EventReport {
    fn from_result(result: StoreResult<EventOutcome>) -> Self {
        match result {
            Ok(outcome) => Self {
                outcome,
                error: None,
            },
            Err(err) => Self {
                outcome: err
                    .created_task()
                    .cloned()
                    .map_or(EventOutcome::Handled, EventOutcome::TodoAdded),
                error: Some(err),
            },
        }
    }

    /// Collapses the report, preferring the error.
    pub fn into_result(self) -> StoreResult<EventOutcome> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.outcome),
        }
    }
}

pub struct TodoView<S: SlotStorage, R: Renderer> {
    store: TaskStore<S>,
    renderer: R,
    filter: TaskFilter,
    editing: Option<TaskId>,
    dirty: Rc<Cell<bool>>,
}

impl<S: SlotStorage, R: Renderer> TodoView<S, R> {
    /// Subscribes to `store` and renders the initial state.
    pub fn attach(mut store: TaskStore<S>, renderer: R) -> Self {
        let dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dirty);
        store.on_change(move || flag.set(true));

        let mut view = Self {
            store,
            renderer,
            filter: TaskFilter::All,
            editing: None,
            dirty,
        };
        view.render();
        view
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn filter(&self) -> TaskFilter {
        self.filter
    }

    /// Row currently in inline edit mode.
    pub fn editing(&self) -> Option<&TaskId> {
        self.editing.as_ref()
    }

    pub fn into_parts(self) -> (TaskStore<S>, R) {
        (self.store, self.renderer)
    }

    /// Reloads the store from its slot and re-renders.
    pub fn reload(&mut self) -> StoreResult<LoadReport> {
        self.editing = None;
        let report = self.store.load();
        self.render_if_dirty(false);
        report
    }

    /// Handles one input event.
    ///
    /// Store errors are reported after the view has re-rendered, so the
    /// surface always reflects in-memory state.
    pub fn handle(&mut self, event: UiEvent) -> EventReport {
        let (result, view_changed) = self.dispatch(event);
        self.render_if_dirty(view_changed);
        EventReport::from_result(result)
    }

    /// Builds the current render model without rendering it.
    pub fn snapshot(&self) -> RenderModel {
        RenderModel::build(&self.store, self.filter, self.editing.as_ref())
    }

    fn dispatch(&mut self, event: UiEvent) -> (StoreResult<EventOutcome>, bool) {
        match event {
            UiEvent::NewTodoKey { key, text } => {
                if key != Key::Enter {
                    return (Ok(EventOutcome::Ignored), false);
                }
                let title = text.trim();
                if title.is_empty() {
                    return (Ok(EventOutcome::Ignored), false);
                }
                (self.store.add(title).map(EventOutcome::TodoAdded), false)
            }
            UiEvent::CheckboxChanged { id, checked } => (
                self.store
                    .update_completed(&id, checked)
                    .map(|_| EventOutcome::Handled),
                false,
            ),
            UiEvent::LabelDoubleClicked { id } => {
                if self.store.get(&id).is_none() {
                    return (Ok(EventOutcome::Ignored), false);
                }
                self.editing = Some(id);
                (Ok(EventOutcome::Handled), true)
            }
            UiEvent::EditKey { id, key, text } => {
                if key != Key::Enter {
                    return (Ok(EventOutcome::Ignored), false);
                }
                self.commit_edit(id, &text)
            }
            UiEvent::EditBlurred { id, text } => self.commit_edit(id, &text),
            UiEvent::DeleteClicked { id } => (
                self.store.destroy(&id).map(|_| EventOutcome::Handled),
                false,
            ),
            UiEvent::ToggleAllChanged { checked } => (
                self.store
                    .toggle_all(checked)
                    .map(|()| EventOutcome::Handled),
                false,
            ),
            UiEvent::ClearCompletedClicked => (
                self.store
                    .clear_completed()
                    .map(|_| EventOutcome::Handled),
                false,
            ),
            UiEvent::FragmentChanged { fragment } => {
                self.filter = TaskFilter::from_fragment(&fragment);
                debug!(
                    "event=filter_changed module=view status=ok filter={}",
                    self.filter.token()
                );
                (Ok(EventOutcome::Handled), true)
            }
        }
    }

    fn commit_edit(&mut self, id: TaskId, text: &str) -> (StoreResult<EventOutcome>, bool) {
        let was_editing = self.editing.as_ref() == Some(&id);
        if was_editing {
            self.editing = None;
        }
        (
            self.store
                .update_title(&id, text.trim())
                .map(|_| EventOutcome::Handled),
            was_editing,
        )
    }

    fn render_if_dirty(&mut self, force: bool) {
        if !self.dirty.replace(false) && !force {
            return;
        }
        if let Some(id) = &self.editing {
            if self.store.get(id).is_none() {
                debug!("event=edit_dropped module=view status=ok id={id}");
                self.editing = None;
            }
        }
        self.render();
    }

    fn render(&mut self) {
        let model = self.snapshot();
        self.renderer.render(&model);
    }
}
