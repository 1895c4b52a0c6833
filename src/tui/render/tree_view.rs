use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, FlatRow, Mode};
use crate::util::unicode;
use crate::view::{CollapseLabel, RenderedTodo};

use super::spans_width;

const INDENT: &str = "  ";

fn collapse_marker(control: Option<CollapseLabel>) -> &'static str {
    match control {
        Some(CollapseLabel::Collapse) => "\u{25BE} ", // ▾
        Some(CollapseLabel::Expand) => "\u{25B8} ",   // ▸
        None => "  ",
    }
}

/// Render the todo tree, the pending input and the delete-completed row
pub fn render_tree_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows = app.rows();
    let visible_height = area.height as usize;
    if visible_height == 0 {
        return;
    }

    app.cursor = app.cursor.min(rows.len().saturating_sub(1));
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if app.cursor >= app.scroll_offset + visible_height {
        app.scroll_offset = app.cursor + 1 - visible_height;
    }

    let scroll = app.scroll_offset;
    let end = rows.len().min(scroll + visible_height);
    let width = area.width as usize;
    let mut lines: Vec<Line> = Vec::with_capacity(visible_height);
    let mut text_cursor: Option<Position> = None;

    for (row, idx) in rows[scroll..end].iter().zip(scroll..end) {
        let is_cursor = idx == app.cursor;
        let y = area.y + (idx - scroll) as u16;
        let (line, cursor_x) = match row {
            FlatRow::Todo { id, depth, control } => match app.session.view().find(id) {
                Some(todo) => render_todo_line(app, todo, *depth, *control, is_cursor, width),
                None => (Line::default(), None),
            },
            FlatRow::Input { depth } => render_input_line(app, *depth, is_cursor),
            FlatRow::DeleteCompleted => (render_delete_completed_line(app, is_cursor), None),
        };
        if let Some(x) = cursor_x {
            let max_x = area.x + area.width.saturating_sub(1);
            text_cursor = Some(Position::new((area.x + x).min(max_x), y));
        }
        lines.push(line);
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, area);

    if let Some(pos) = text_cursor {
        frame.set_cursor_position(pos);
    }
}

/// Column 0: accent bar on the cursor row
fn gutter<'a>(app: &App, is_cursor: bool) -> Span<'a> {
    if is_cursor {
        Span::styled(
            "\u{258E}",
            Style::default()
                .fg(app.theme.selection_border)
                .bg(app.theme.selection_bg),
        )
    } else {
        Span::styled(" ", Style::default().bg(app.theme.background))
    }
}

fn row_bg(app: &App, is_cursor: bool) -> ratatui::style::Color {
    if is_cursor {
        app.theme.selection_bg
    } else {
        app.theme.background
    }
}

/// A todo row. Returns the line and, while this todo is being edited, the
/// column of the text cursor.
fn render_todo_line<'a>(
    app: &App,
    todo: &RenderedTodo,
    depth: usize,
    control: Option<CollapseLabel>,
    is_cursor: bool,
    width: usize,
) -> (Line<'a>, Option<u16>) {
    let bg = row_bg(app, is_cursor);
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let mut spans = vec![gutter(app, is_cursor)];
    spans.push(Span::styled(INDENT.repeat(depth), dim));
    spans.push(Span::styled(collapse_marker(control), dim));
    let (checkbox, check_style) = if todo.completed {
        ("[x] ", Style::default().fg(app.theme.done).bg(bg))
    } else {
        ("[ ] ", Style::default().fg(app.theme.text).bg(bg))
    };
    spans.push(Span::styled(checkbox, check_style));

    let prefix_w = spans_width(&spans);
    let editing = app.mode == Mode::Edit && app.editing.as_deref() == Some(todo.id.as_str());
    if editing {
        spans.push(Span::styled(
            app.edit.text().to_string(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
        let col = prefix_w + app.edit.cursor_col();
        return (Line::from(spans), Some(col as u16));
    }

    let text_style = if todo.completed {
        dim.add_modifier(Modifier::CROSSED_OUT)
    } else if is_cursor {
        Style::default().fg(app.theme.text_bright).bg(bg)
    } else {
        Style::default().fg(app.theme.text).bg(bg)
    };
    let hint = match control {
        Some(label) if is_cursor && app.show_key_hints => format!("  {}", label.text()),
        _ => String::new(),
    };
    let room = width.saturating_sub(prefix_w + unicode::display_width(&hint));
    spans.push(Span::styled(
        unicode::truncate_to_width(&todo.text, room),
        text_style,
    ));
    if !hint.is_empty() {
        spans.push(Span::styled(hint, dim));
    }
    (Line::from(spans), None)
}

/// The pending input row. Returns the text cursor column while it has focus.
fn render_input_line<'a>(app: &App, depth: usize, is_cursor: bool) -> (Line<'a>, Option<u16>) {
    let bg = row_bg(app, is_cursor);
    let focused = app.mode == Mode::Input;

    let mut spans = vec![gutter(app, is_cursor)];
    spans.push(Span::styled(
        format!("{}{}", INDENT.repeat(depth), INDENT),
        Style::default().bg(bg),
    ));
    spans.push(Span::styled(
        "+ ",
        Style::default().fg(app.theme.highlight).bg(bg),
    ));
    let prefix_w = spans_width(&spans);

    if app.input.is_empty() && !focused {
        spans.push(Span::styled(
            "new todo",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    } else {
        spans.push(Span::styled(
            app.input.text().to_string(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
    }

    let cursor = focused.then(|| (prefix_w + app.input.cursor_col()) as u16);
    (Line::from(spans), cursor)
}

fn render_delete_completed_line<'a>(app: &App, is_cursor: bool) -> Line<'a> {
    let bg = row_bg(app, is_cursor);
    Line::from(vec![
        gutter(app, is_cursor),
        Span::styled(INDENT, Style::default().bg(bg)),
        Span::styled(
            "[D] delete completed",
            Style::default().fg(app.theme.highlight).bg(bg),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use crate::util::LineEdit;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    fn render_tree(app: &mut App, w: u16, h: u16) -> String {
        render_to_string(w, h, |frame, area| render_tree_view(frame, app, area))
    }

    #[test]
    fn nested_tree_with_input() {
        let mut app = app_with(NESTED_JSON);
        let output = render_tree(&mut app, 40, 8);
        assert_snapshot!(output);
    }

    #[test]
    fn empty_tree_shows_only_input() {
        let mut app = app_with("");
        let output = render_tree(&mut app, 40, 4);
        assert_eq!(output, "\u{258E}  +");
    }

    #[test]
    fn unfocused_input_shows_placeholder() {
        let mut app = app_with("");
        app.leave_input();
        let output = render_tree(&mut app, 40, 4);
        assert_eq!(output, "\u{258E}  + new todo");
    }

    #[test]
    fn collapsed_node_hides_children_and_shows_label() {
        let mut app = app_with(NESTED_JSON);
        app.leave_input();
        app.cursor_to_todo("a");
        app.toggle_collapse("a");
        let output = render_tree(&mut app, 40, 8);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "\u{258E}\u{25B8} [ ] groceries  Expand");
        assert_eq!(lines[1], "   [ ] laundry");
        assert!(!output.contains("milk"));
    }

    #[test]
    fn edit_field_replaces_text() {
        let mut app = app_with(NESTED_JSON);
        app.start_edit("b");
        app.edit = LineEdit::with_text("oat milk");
        let output = render_tree(&mut app, 40, 8);
        assert!(output.lines().any(|l| l == "\u{258E}    [ ] oat milk"));
    }

    #[test]
    fn long_text_is_truncated() {
        let raw = r#"[{"id":"a","text":"a very long todo that will not fit"}]"#;
        let mut app = app_with(raw);
        let output = render_tree(&mut app, 20, 3);
        let first = output.lines().next().unwrap_or_default();
        assert_eq!(first, "   [ ] a very long \u{2026}");
    }

    #[test]
    fn scrolls_to_keep_cursor_visible() {
        let mut app = app_with(NESTED_JSON);
        app.leave_input();
        app.cursor_to_bottom();
        let output = render_tree(&mut app, 40, 3);
        assert_eq!(app.scroll_offset, 3);
        assert!(output.contains("delete completed"));
        assert!(!output.contains("groceries"));
    }
}
