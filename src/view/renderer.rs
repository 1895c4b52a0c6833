use std::collections::HashSet;

use crate::model::todo::Todo;

use super::collapse::{capture_collapsed, is_collapsed};
use super::rendered::{CollapseLabel, ListTarget, PendingInput, RenderedTodo, RenderedTree, Sublist};

/// What held input focus when a render pass started
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Focus {
    /// The pending input field
    #[default]
    PendingInput,
    /// The text field of the todo with this id
    EditField(String),
    /// A checkbox, button, or nothing
    Control,
}

/// Rebuild the whole view from `todos`.
///
/// Collapse state is read from `previous` before anything is built, so
/// sublists hidden there stay hidden. The pending input follows focus: if a
/// text field was focused, the input lands in the list that field lived in
/// (when that list still exists and is visible); otherwise in the root list.
pub fn rebuild(todos: &[Todo], previous: &RenderedTree, focus: &Focus) -> RenderedTree {
    let collapsed = capture_collapsed(previous);

    let focused_list = match focus {
        Focus::PendingInput => Some(previous.input.attached_to.clone()),
        Focus::EditField(id) => previous.list_of(id),
        Focus::Control => None,
    };

    let mut view = RenderedTree {
        items: todos.iter().map(|t| build_item(t, &collapsed)).collect(),
        input: PendingInput::default(),
        delete_completed_visible: false,
    };

    if let Some(target) = focused_list
        && view.is_list_visible(&target)
    {
        view.input.attached_to = target;
    }
    view.delete_completed_visible = view.any_completed();
    view
}

fn build_item(todo: &Todo, collapsed: &HashSet<String>) -> RenderedTodo {
    if todo.children.is_empty() {
        return RenderedTodo {
            id: todo.id.clone(),
            text: todo.text.clone(),
            completed: todo.completed,
            collapse_control: None,
            sublist: None,
        };
    }

    let hidden = is_collapsed(collapsed, &todo.id);
    RenderedTodo {
        id: todo.id.clone(),
        text: todo.text.clone(),
        completed: todo.completed,
        collapse_control: Some(CollapseLabel::for_hidden(hidden)),
        sublist: Some(Sublist {
            id: todo.id.clone(),
            hidden,
            items: todo
                .children
                .iter()
                .map(|child| build_item(child, collapsed))
                .collect(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Pending input placement
// ---------------------------------------------------------------------------

/// Move the pending input to the end of todo `id`'s sublist, giving the todo
/// an empty (visible) sublist first if it has none.
pub fn open_sub_input(view: &mut RenderedTree, id: &str) -> bool {
    let Some(todo) = view.find_mut(id) else {
        return false;
    };
    todo.sublist.get_or_insert_with(|| Sublist {
        id: id.to_string(),
        hidden: false,
        items: Vec::new(),
    });
    view.input.attached_to = ListTarget::Sublist(id.to_string());
    true
}

/// Move the pending input under the todo just before it in its list.
/// A hidden sublist there is shown first. No preceding todo: no-op.
pub fn indent_input(view: &mut RenderedTree) -> bool {
    let previous_id = match view
        .list_items(&view.input.attached_to)
        .and_then(|items| items.last())
    {
        Some(todo) => todo.id.clone(),
        None => return false,
    };

    if let Some(todo) = view.find_mut(&previous_id)
        && let Some(sub) = todo.sublist.as_mut()
        && sub.hidden
    {
        sub.hidden = false;
        if let Some(control) = todo.collapse_control.as_mut() {
            *control = CollapseLabel::Collapse;
        }
    }
    open_sub_input(view, &previous_id)
}

/// Move the pending input to the end of the list holding todo `id`
pub fn move_input_to_list_of(view: &mut RenderedTree, id: &str) -> bool {
    match view.list_of(id) {
        Some(target) => {
            view.input.attached_to = target;
            true
        }
        None => false,
    }
}
