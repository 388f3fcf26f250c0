//! Plain-text rendering of view snapshots.

use todolist_core::{RenderModel, Renderer};

/// Keeps the most recent frame; the CLI prints it once the command is done.
#[derive(Debug, Default)]
pub struct LastFrame {
    frame: Option<RenderModel>,
}

impl LastFrame {
    pub fn frame(&self) -> Option<&RenderModel> {
        self.frame.as_ref()
    }
}

impl Renderer for LastFrame {
    fn render(&mut self, model: &RenderModel) {
        self.frame = Some(model.clone());
    }
}

pub fn format_list(model: &RenderModel) -> String {
    let mut out = String::new();
    for item in &model.items {
        let mark = if item.completed { "x" } else { " " };
        out.push_str(&format!("[{mark}] {}  {}\n", item.id, item.title));
    }
    out.push_str(&format_footer(model));
    out
}

pub fn format_footer(model: &RenderModel) -> String {
    let footer = &model.footer;
    let mut line = format!("{} {} left", footer.incomplete, footer.items_plural_form);
    if footer.show_filters {
        let links = footer
            .filters
            .iter()
            .map(|link| {
                if link.selected {
                    format!("*{}*", link.name)
                } else {
                    link.name.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" | ");
        line.push_str(&format!("  [{links}]  {} completed", footer.completed));
    }
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::{format_list, LastFrame};
    use todolist_core::{EventOutcome, Key, MemorySlotStorage, TaskStore, TodoView, UiEvent};

    #[test]
    fn list_marks_completed_rows_and_selected_filter() {
        let store = TaskStore::open(MemorySlotStorage::new());
        let mut view = TodoView::attach(store, LastFrame::default());
        let outcome = view
            .handle(UiEvent::NewTodoKey {
                key: Key::Enter,
                text: "ship it".to_string(),
            })
            .into_result()
            .unwrap();
        let EventOutcome::TodoAdded(id) = outcome else {
            panic!("expected a new task");
        };
        view.handle(UiEvent::CheckboxChanged { id, checked: true })
            .into_result()
            .unwrap();

        let text = format_list(view.renderer().frame().unwrap());
        assert!(text.contains("[x]"));
        assert!(text.contains("ship it"));
        assert!(text.contains("0 items left"));
        assert!(text.contains("*All*"));
    }
}
