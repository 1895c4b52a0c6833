use crate::io::store::Store;
use crate::model::todo::Todo;
use crate::ops::tree_ops;
use crate::view::{self, Focus, ListTarget, RenderedTree};

/// Application state: the todo tree, its current view, and the store it
/// persists to.
///
/// Every mutating entry point follows the same path: locate the target by
/// id, apply the change, then [`Session::render`] (save + full rebuild).
/// Targets that cannot be found make the call a no-op that returns `false`
/// (or `None`) without rendering.
pub struct Session<S: Store> {
    todos: Vec<Todo>,
    view: RenderedTree,
    focus: Focus,
    store: S,
    key: String,
    save_error: Option<String>,
}

impl<S: Store> Session<S> {
    /// Load the list stored under `key` and render it once
    pub fn open(mut store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let todos = store.load(&key);
        let mut session = Session {
            todos,
            view: RenderedTree::default(),
            focus: Focus::PendingInput,
            store,
            key,
            save_error: None,
        };
        session.render();
        session
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn view(&self) -> &RenderedTree {
        &self.view
    }

    pub fn focus(&self) -> &Focus {
        &self.focus
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Message from the last failed save, cleared by the next successful one
    pub fn save_error(&self) -> Option<&str> {
        self.save_error.as_deref()
    }

    pub fn input_target(&self) -> &ListTarget {
        &self.view.input.attached_to
    }

    /// Record which element holds input focus; read by the next render
    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }

    /// Save the tree, then rebuild the view. Afterwards the pending input
    /// holds focus.
    pub fn render(&mut self) {
        match self.store.save(&self.key, &self.todos) {
            Ok(()) => self.save_error = None,
            Err(e) => self.save_error = Some(e.to_string()),
        }
        self.view = view::rebuild(&self.todos, &self.view, &self.focus);
        self.focus = Focus::PendingInput;
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// New todo text submitted in the pending input. Returns the new id.
    pub fn add_submitted(&mut self, target: &ListTarget, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let list = match target {
            ListTarget::Root => &mut self.todos,
            ListTarget::Sublist(parent) => tree_ops::children_mut(&mut self.todos, parent).ok()?,
        };
        let id = tree_ops::add_todo(list, text);
        self.view.input.attached_to = target.clone();
        self.render();
        Some(id)
    }

    /// New text submitted for an existing todo. Blank text deletes it.
    pub fn edit_submitted(&mut self, id: &str, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return self.delete_requested(id);
        }
        let Some(found) = tree_ops::locate_mut(&mut self.todos, id) else {
            return false;
        };
        tree_ops::edit_text(found.list, found.index, text);
        self.render();
        true
    }

    pub fn delete_requested(&mut self, id: &str) -> bool {
        let Some(found) = tree_ops::locate_mut(&mut self.todos, id) else {
            return false;
        };
        let removed = tree_ops::delete_at(found.list, found.index);
        self.store
            .record_deletion(&self.key, std::slice::from_ref(&removed));
        self.render();
        true
    }

    /// Flip a todo's completion, then move the pending input to its list
    pub fn toggle_requested(&mut self, id: &str) -> bool {
        let Some(found) = tree_ops::locate_mut(&mut self.todos, id) else {
            return false;
        };
        tree_ops::toggle_completed(found.list, found.index);
        self.render();
        view::move_input_to_list_of(&mut self.view, id);
        true
    }

    /// Show or hide a todo's sublist. View only: nothing is saved.
    pub fn collapse_toggle_requested(&mut self, id: &str) -> bool {
        view::toggle_collapse(&mut self.view, id)
    }

    /// Escape or blur in a todo's text field. A non-blank value discards the
    /// edit; a blank one deletes the todo.
    pub fn cancel_requested(&mut self, id: &str, current_value: &str) -> bool {
        if current_value.trim().is_empty() {
            return self.delete_requested(id);
        }
        self.focus = Focus::Control;
        self.render();
        true
    }

    /// Remove every todo currently rendered as completed. Returns how many
    /// subtrees were removed.
    pub fn delete_completed_requested(&mut self) -> usize {
        let ids = self.view.completed_ids();
        let removed = tree_ops::delete_completed(&mut self.todos, ids.iter().map(String::as_str));
        self.store.record_deletion(&self.key, &removed);
        self.render();
        removed.len()
    }

    // -----------------------------------------------------------------------
    // Pending input placement (no render)
    // -----------------------------------------------------------------------

    pub fn open_sub_input(&mut self, id: &str) -> bool {
        view::open_sub_input(&mut self.view, id)
    }

    pub fn indent_input(&mut self) -> bool {
        view::indent_input(&mut self.view)
    }

    pub fn move_input_to_list_of(&mut self, id: &str) -> bool {
        view::move_input_to_list_of(&mut self.view, id)
    }
}
