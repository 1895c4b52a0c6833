use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, FlatRow};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,

        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
        KeyCode::Char('g') | KeyCode::Home => app.cursor_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.cursor_to_bottom(),

        KeyCode::Char('i') | KeyCode::Char('a') => app.focus_input(),
        KeyCode::Char('D') => app.delete_completed(),
        KeyCode::Enter | KeyCode::Char('e') => activate(app),

        KeyCode::Char(' ') | KeyCode::Char('x') => {
            if let Some(id) = app.cursor_todo_id() {
                app.toggle(&id);
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(id) = app.cursor_todo_id() {
                app.delete(&id);
            }
        }
        KeyCode::Char('c') => {
            if let Some(id) = app.cursor_todo_id() {
                app.toggle_collapse(&id);
            }
        }
        KeyCode::Left => {
            if let Some(id) = app.cursor_todo_id() {
                app.set_collapsed(&id, true);
            }
        }
        KeyCode::Right => {
            if let Some(id) = app.cursor_todo_id() {
                app.set_collapsed(&id, false);
            }
        }
        KeyCode::Tab => {
            if let Some(id) = app.cursor_todo_id() {
                app.open_or_expand(&id);
            }
        }
        _ => {}
    }
}

/// Enter on a row: edit a todo, focus the input, or run the sweep
fn activate(app: &mut App) {
    match app.cursor_row() {
        Some(FlatRow::Todo { id, .. }) => app.start_edit(&id),
        Some(FlatRow::Input { .. }) => app.focus_input(),
        Some(FlatRow::DeleteCompleted) => app.delete_completed(),
        None => {}
    }
}
