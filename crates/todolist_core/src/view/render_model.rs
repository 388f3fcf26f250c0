//! Presentation snapshot handed to renderers.
//!
//! Built from store queries only; renderers never see the store itself.

use crate::model::filter::TaskFilter;
use crate::model::task::TaskId;
use crate::storage::SlotStorage;
use crate::store::task_store::TaskStore;

/// One row of the visible list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    /// Row is in inline edit mode.
    pub editing: bool,
}

/// Footer link selecting one filter kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterLink {
    pub name: &'static str,
    pub value: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterView {
    pub incomplete: usize,
    pub completed: usize,
    /// `item` for exactly one incomplete task, `items` otherwise.
    pub items_plural_form: &'static str,
    /// Filter links appear once at least one task is completed.
    pub show_filters: bool,
    pub filters: Vec<FilterLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderModel {
    pub filter: TaskFilter,
    pub items: Vec<ItemView>,
    /// Bulk toggle shows checked when nothing is left to do.
    pub toggle_all_checked: bool,
    pub footer: FooterView,
}

impl RenderModel {
    pub fn build<S: SlotStorage>(
        store: &TaskStore<S>,
        filter: TaskFilter,
        editing: Option<&TaskId>,
    ) -> Self {
        let items = store
            .iter_filtered(filter)
            .map(|task| ItemView {
                id: task.id.clone(),
                title: task.title.clone(),
                completed: task.completed,
                editing: editing == Some(&task.id),
            })
            .collect();

        let size = store.size();
        let completed = store.completed_count();
        let incomplete = size - completed;

        Self {
            filter,
            items,
            toggle_all_checked: incomplete == 0,
            footer: FooterView {
                incomplete,
                completed,
                items_plural_form: if incomplete == 1 { "item" } else { "items" },
                show_filters: size > 0 && completed > 0,
                filters: TaskFilter::ALL_KINDS
                    .iter()
                    .map(|kind| FilterLink {
                        name: kind.label(),
                        value: kind.token(),
                        selected: *kind == filter,
                    })
                    .collect(),
            },
        }
    }
}
