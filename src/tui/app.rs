use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::store::{JsonFileStore, Store};
use crate::model::Config;
use crate::ops::Session;
use crate::ops::tree_ops;
use crate::util::LineEdit;
use crate::view::{CollapseLabel, Focus, ListTarget, RenderedTodo, RenderedTree};

use super::input;
use super::render;
use super::theme::Theme;

pub type AppSession = Session<Box<dyn Store>>;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Moving between rows
    Navigate,
    /// Typing into the pending input
    Input,
    /// Editing the text of an existing todo
    Edit,
}

/// One visible row of the tree view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatRow {
    Todo {
        id: String,
        depth: usize,
        /// Collapse control of the todo, if it has one
        control: Option<CollapseLabel>,
    },
    /// The pending input, at the end of the list it is attached to
    Input { depth: usize },
    /// The "delete completed" control
    DeleteCompleted,
}

/// Flatten the visible part of a rendered tree into rows, in document order
pub fn flatten(view: &RenderedTree) -> Vec<FlatRow> {
    let mut rows = Vec::new();
    flatten_list(
        &view.items,
        &ListTarget::Root,
        0,
        &view.input.attached_to,
        &mut rows,
    );
    if view.delete_completed_visible {
        rows.push(FlatRow::DeleteCompleted);
    }
    rows
}

fn flatten_list(
    items: &[RenderedTodo],
    list: &ListTarget,
    depth: usize,
    input_at: &ListTarget,
    rows: &mut Vec<FlatRow>,
) {
    for item in items {
        rows.push(FlatRow::Todo {
            id: item.id.clone(),
            depth,
            control: item.collapse_control,
        });
        if let Some(sub) = &item.sublist
            && !sub.hidden
        {
            let target = ListTarget::Sublist(sub.id.clone());
            flatten_list(&sub.items, &target, depth + 1, input_at, rows);
        }
    }
    if list == input_at {
        rows.push(FlatRow::Input { depth });
    }
}

/// Main application state
pub struct App {
    pub session: AppSession,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// Cursor index into the flat rows
    pub cursor: usize,
    /// First visible row
    pub scroll_offset: usize,
    /// Text typed into the pending input
    pub input: LineEdit,
    /// Buffer for the todo being edited
    pub edit: LineEdit,
    /// Id of the todo being edited (Edit mode)
    pub editing: Option<String>,
    pub show_help: bool,
    pub show_key_hints: bool,
    /// Transient message for the status row
    pub status_message: Option<String>,
    /// The status message reports a failure
    pub status_error: bool,
}

impl App {
    /// Starts with the pending input focused, as after any render
    pub fn new(session: AppSession, config: &Config) -> Self {
        let mut app = App {
            session,
            mode: Mode::Input,
            should_quit: false,
            theme: Theme::from_config(&config.ui),
            cursor: 0,
            scroll_offset: 0,
            input: LineEdit::new(),
            edit: LineEdit::new(),
            editing: None,
            show_help: false,
            show_key_hints: config.ui.show_key_hints,
            status_message: None,
            status_error: false,
        };
        app.cursor_to_input();
        app.note_save_result();
        app
    }

    pub fn rows(&self) -> Vec<FlatRow> {
        flatten(self.session.view())
    }

    pub fn cursor_row(&self) -> Option<FlatRow> {
        self.rows().into_iter().nth(self.cursor)
    }

    /// Id of the todo under the cursor
    pub fn cursor_todo_id(&self) -> Option<String> {
        match self.cursor_row()? {
            FlatRow::Todo { id, .. } => Some(id),
            _ => None,
        }
    }

    /// (total, completed) todo counts
    pub fn counts(&self) -> (usize, usize) {
        let todos = self.session.todos();
        (
            tree_ops::count_todos(todos),
            tree_ops::count_completed(todos),
        )
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
    }

    pub fn cursor_to_top(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_to_bottom(&mut self) {
        self.cursor = self.rows().len().saturating_sub(1);
    }

    pub fn cursor_to_input(&mut self) {
        if let Some(i) = self
            .rows()
            .iter()
            .position(|r| matches!(r, FlatRow::Input { .. }))
        {
            self.cursor = i;
        }
    }

    /// Put the cursor on todo `id`; returns false when it is not visible
    pub fn cursor_to_todo(&mut self, id: &str) -> bool {
        let found = self
            .rows()
            .iter()
            .position(|r| matches!(r, FlatRow::Todo { id: row_id, .. } if row_id == id));
        if let Some(i) = found {
            self.cursor = i;
        }
        found.is_some()
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Surface a failed save in the status row
    fn note_save_result(&mut self) {
        if let Some(err) = self.session.save_error() {
            self.status_message = Some(format!("save failed: {}", err));
            self.status_error = true;
        }
    }

    fn is_hidden(&self, id: &str) -> bool {
        self.session
            .view()
            .find(id)
            .and_then(|t| t.sublist.as_ref())
            .is_some_and(|s| s.hidden)
    }

    // -----------------------------------------------------------------------
    // Pending input
    // -----------------------------------------------------------------------

    pub fn focus_input(&mut self) {
        self.mode = Mode::Input;
        self.session.set_focus(Focus::PendingInput);
        self.cursor_to_input();
    }

    /// Esc on the pending input: drop the typed text and go back to rows
    pub fn leave_input(&mut self) {
        self.input.clear();
        self.mode = Mode::Navigate;
        self.session.set_focus(Focus::Control);
    }

    pub fn submit_input(&mut self) {
        let target = self.session.input_target().clone();
        let text = self.input.take();
        self.session.set_focus(Focus::PendingInput);
        if self.session.add_submitted(&target, &text).is_some() {
            self.note_save_result();
        }
        self.cursor_to_input();
    }

    pub fn indent_input(&mut self) {
        if self.session.indent_input() {
            self.cursor_to_input();
        }
    }

    // -----------------------------------------------------------------------
    // Todo rows
    // -----------------------------------------------------------------------

    pub fn start_edit(&mut self, id: &str) {
        let Some(todo) = self.session.view().find(id) else {
            return;
        };
        self.edit = LineEdit::with_text(todo.text.clone());
        self.editing = Some(id.to_string());
        self.mode = Mode::Edit;
        self.session.set_focus(Focus::EditField(id.to_string()));
        self.cursor_to_todo(id);
    }

    /// Enter in the edit field. Afterwards the pending input (now in the
    /// edited todo's list) has focus.
    pub fn submit_edit(&mut self) {
        let Some(id) = self.editing.take() else {
            return;
        };
        let text = self.edit.take();
        self.session.set_focus(Focus::EditField(id.clone()));
        if self.session.edit_submitted(&id, &text) {
            self.note_save_result();
        }
        self.focus_input();
    }

    /// Esc in the edit field: a blank buffer deletes the todo, anything
    /// else is discarded
    pub fn cancel_edit(&mut self) {
        let Some(id) = self.editing.take() else {
            return;
        };
        let text = self.edit.take();
        self.session.set_focus(Focus::EditField(id.clone()));
        if self.session.cancel_requested(&id, &text) {
            self.note_save_result();
        }
        self.mode = Mode::Navigate;
        if !self.cursor_to_todo(&id) {
            self.clamp_cursor();
        }
    }

    /// Down arrow in the edit field: leave it unsaved and focus the input
    pub fn edit_to_input(&mut self) {
        self.editing = None;
        self.edit.clear();
        self.focus_input();
    }

    /// Tab in the edit field: open a sub input under the todo, or expand it
    pub fn edit_tab(&mut self) {
        if self.edit.text().trim().is_empty() {
            return;
        }
        let Some(id) = self.editing.take() else {
            return;
        };
        self.edit.clear();
        self.open_or_expand(&id);
    }

    /// Expand `id` if it is collapsed, otherwise move the pending input
    /// under it and focus it
    pub fn open_or_expand(&mut self, id: &str) {
        if self.is_hidden(id) {
            self.session.collapse_toggle_requested(id);
            self.mode = Mode::Navigate;
            self.cursor_to_todo(id);
        } else if self.session.open_sub_input(id) {
            self.focus_input();
        }
    }

    pub fn toggle(&mut self, id: &str) {
        self.session.set_focus(Focus::Control);
        if self.session.toggle_requested(id) {
            self.note_save_result();
        }
        self.cursor_to_todo(id);
    }

    pub fn delete(&mut self, id: &str) {
        self.session.set_focus(Focus::Control);
        if self.session.delete_requested(id) {
            self.note_save_result();
            self.clamp_cursor();
        }
    }

    pub fn toggle_collapse(&mut self, id: &str) {
        if self.session.collapse_toggle_requested(id) {
            self.cursor_to_todo(id);
        }
    }

    /// Collapse (`true`) or expand (`false`) only if not already in that state
    pub fn set_collapsed(&mut self, id: &str, collapsed: bool) {
        let has_control = self
            .session
            .view()
            .find(id)
            .is_some_and(|t| t.collapse_control.is_some());
        if has_control && self.is_hidden(id) != collapsed {
            self.toggle_collapse(id);
        }
    }

    pub fn delete_completed(&mut self) {
        self.session.set_focus(Focus::Control);
        let removed = self.session.delete_completed_requested();
        self.note_save_result();
        if self.status_message.is_none() && removed > 0 {
            let noun = if removed == 1 { "todo" } else { "todos" };
            self.status_message = Some(format!("deleted {} completed {}", removed, noun));
        }
        self.clamp_cursor();
    }
}

/// Run the TUI against the store in `data_dir`
pub fn run(
    data_dir: &Path,
    namespace: &str,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let store: Box<dyn Store> = Box::new(JsonFileStore::new(data_dir));
    let session = Session::open(store, namespace);
    let mut app = App::new(session, config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal before the panic message prints
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::app_with;
    use pretty_assertions::assert_eq;

    const NESTED: &str = r#"[
        {"id":"a","text":"groceries","children":[
            {"id":"b","text":"milk","children":[{"id":"c","text":"2%"}]},
            {"id":"d","text":"eggs","completed":true}
        ]},
        {"id":"e","text":"laundry"}
    ]"#;

    fn todo_row(id: &str, depth: usize, control: Option<CollapseLabel>) -> FlatRow {
        FlatRow::Todo {
            id: id.into(),
            depth,
            control,
        }
    }

    #[test]
    fn flatten_puts_input_after_its_list() {
        let app = app_with(NESTED);
        assert_eq!(
            app.rows(),
            vec![
                todo_row("a", 0, Some(CollapseLabel::Collapse)),
                todo_row("b", 1, Some(CollapseLabel::Collapse)),
                todo_row("c", 2, None),
                todo_row("d", 1, None),
                todo_row("e", 0, None),
                FlatRow::Input { depth: 0 },
                FlatRow::DeleteCompleted,
            ]
        );
        assert_eq!(app.mode, Mode::Input);
        assert_eq!(app.cursor, 5);
    }

    #[test]
    fn flatten_skips_hidden_sublists() {
        let mut app = app_with(NESTED);
        app.toggle_collapse("a");
        assert_eq!(
            app.rows(),
            vec![
                todo_row("a", 0, Some(CollapseLabel::Expand)),
                todo_row("e", 0, None),
                FlatRow::Input { depth: 0 },
                FlatRow::DeleteCompleted,
            ]
        );
    }

    #[test]
    fn empty_list_has_only_input() {
        let app = app_with("");
        assert_eq!(app.rows(), vec![FlatRow::Input { depth: 0 }]);
        assert_eq!(app.counts(), (0, 0));
    }

    #[test]
    fn typing_and_submitting_adds() {
        let mut app = app_with("");
        app.input = LineEdit::with_text("buy milk");
        app.submit_input();
        assert_eq!(app.session.todos()[0].text, "buy milk");
        assert!(app.input.is_empty());
        assert_eq!(app.cursor_row(), Some(FlatRow::Input { depth: 0 }));
    }

    #[test]
    fn indent_then_add_child() {
        let mut app = app_with(NESTED);
        app.indent_input();
        assert_eq!(app.cursor_row(), Some(FlatRow::Input { depth: 1 }));
        app.input = LineEdit::with_text("whites");
        app.submit_input();
        assert_eq!(app.session.todos()[1].children[0].text, "whites");
        assert_eq!(app.cursor_row(), Some(FlatRow::Input { depth: 1 }));
    }

    #[test]
    fn edit_submit_moves_input_to_list() {
        let mut app = app_with(NESTED);
        app.start_edit("b");
        assert_eq!(app.mode, Mode::Edit);
        assert_eq!(app.edit.text(), "milk");
        app.edit = LineEdit::with_text("oat milk");
        app.submit_edit();
        assert_eq!(app.session.todos()[0].children[0].text, "oat milk");
        assert_eq!(app.mode, Mode::Input);
        assert_eq!(app.session.input_target(), &ListTarget::sublist("a"));
    }

    #[test]
    fn cancel_edit_blank_deletes() {
        let mut app = app_with(NESTED);
        app.start_edit("e");
        app.edit.clear();
        app.cancel_edit();
        assert_eq!(app.session.todos().len(), 1);
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn cancel_edit_keeps_text() {
        let mut app = app_with(NESTED);
        app.start_edit("e");
        app.edit = LineEdit::with_text("half typed");
        app.cancel_edit();
        assert_eq!(app.session.todos()[1].text, "laundry");
        assert_eq!(app.cursor_todo_id().as_deref(), Some("e"));
    }

    #[test]
    fn tab_on_collapsed_expands_else_opens_input() {
        let mut app = app_with(NESTED);
        app.toggle_collapse("a");
        app.open_or_expand("a");
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.rows().len(), 7);

        app.open_or_expand("c");
        assert_eq!(app.mode, Mode::Input);
        assert_eq!(app.session.input_target(), &ListTarget::sublist("c"));
        assert_eq!(app.cursor_row(), Some(FlatRow::Input { depth: 3 }));
    }

    #[test]
    fn toggle_keeps_cursor_on_todo() {
        let mut app = app_with(NESTED);
        app.toggle("c");
        assert!(app.session.todos()[0].children[0].children[0].completed);
        assert_eq!(app.cursor_todo_id().as_deref(), Some("c"));
        assert_eq!(app.session.input_target(), &ListTarget::sublist("b"));
    }

    #[test]
    fn sweep_reports_count() {
        let mut app = app_with(NESTED);
        app.delete_completed();
        assert_eq!(app.counts(), (4, 0));
        assert_eq!(app.status_message.as_deref(), Some("deleted 1 completed todo"));
        assert!(!app.rows().contains(&FlatRow::DeleteCompleted));
    }

    #[test]
    fn set_collapsed_is_idempotent() {
        let mut app = app_with(NESTED);
        app.set_collapsed("a", false);
        assert!(!app.is_hidden("a"));
        app.set_collapsed("a", true);
        app.set_collapsed("a", true);
        assert!(app.is_hidden("a"));
        app.set_collapsed("e", true);
        assert!(!app.is_hidden("e"));
    }
}
