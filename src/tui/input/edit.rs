use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};
use crate::util::LineEdit;
use crate::view::Focus;

/// Keys typed into the pending input
pub(super) fn handle_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_input(),
        KeyCode::Tab => app.indent_input(),
        KeyCode::Esc => app.leave_input(),
        // Back to the rows, keeping whatever was typed
        KeyCode::Up => {
            app.mode = Mode::Navigate;
            app.session.set_focus(Focus::Control);
            app.move_cursor(-1);
        }
        _ => {
            edit_line(&mut app.input, key);
        }
    }
}

/// Keys typed while editing an existing todo
pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_edit(),
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Down => app.edit_to_input(),
        KeyCode::Tab => app.edit_tab(),
        _ => {
            edit_line(&mut app.edit, key);
        }
    }
}

/// Single-line editing keys shared by both text fields. Returns whether the
/// key was consumed.
fn edit_line(line: &mut LineEdit, key: KeyEvent) -> bool {
    let m = key.modifiers;
    let ctrl = m.contains(KeyModifiers::CONTROL);
    let alt = m.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('a') if ctrl => line.home(),
        KeyCode::Char('e') if ctrl => line.end(),
        KeyCode::Char('u') if ctrl => line.kill_to_start(),
        KeyCode::Char('w') if ctrl => line.delete_word_left(),
        // Readline word movement; some terminals send these for Alt+arrows
        KeyCode::Char('b') if alt => line.word_left(),
        KeyCode::Char('f') if alt => line.word_right(),
        KeyCode::Backspace if ctrl || alt => line.delete_word_left(),
        KeyCode::Backspace => line.backspace(),
        KeyCode::Delete => line.delete(),
        KeyCode::Left if alt || ctrl => line.word_left(),
        KeyCode::Right if alt || ctrl => line.word_right(),
        KeyCode::Left => line.move_left(),
        KeyCode::Right => line.move_right(),
        KeyCode::Home => line.home(),
        KeyCode::End => line.end(),
        KeyCode::Char(c) if !ctrl && !alt => line.insert_char(c),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn readline_keys() {
        let mut line = LineEdit::with_text("buy oat milk");
        assert!(edit_line(&mut line, key(KeyCode::Char('w'), KeyModifiers::CONTROL)));
        assert_eq!(line.text(), "buy oat ");
        edit_line(&mut line, key(KeyCode::Char('a'), KeyModifiers::CONTROL));
        assert_eq!(line.cursor(), 0);
        edit_line(&mut line, key(KeyCode::Char('f'), KeyModifiers::ALT));
        assert_eq!(line.cursor(), 4);
        edit_line(&mut line, key(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(line.text(), "oat ");
    }

    #[test]
    fn shifted_chars_insert() {
        let mut line = LineEdit::new();
        edit_line(&mut line, key(KeyCode::Char('A'), KeyModifiers::SHIFT));
        edit_line(&mut line, key(KeyCode::Char('%'), KeyModifiers::SHIFT));
        assert_eq!(line.text(), "A%");
    }

    #[test]
    fn unknown_keys_are_not_consumed() {
        let mut line = LineEdit::with_text("x");
        assert!(!edit_line(&mut line, key(KeyCode::F(2), KeyModifiers::NONE)));
        assert!(!edit_line(&mut line, key(KeyCode::Char('z'), KeyModifiers::CONTROL)));
        assert_eq!(line.text(), "x");
    }
}
