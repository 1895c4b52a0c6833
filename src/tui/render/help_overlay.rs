use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

const ROWS: &[(&str, &str)] = &[
    (" \u{2191}\u{2193}/jk", "Move cursor up/down"),
    (" g/G", "Jump to top/bottom"),
    (" Space/x", "Toggle completed"),
    (" Enter/e", "Edit todo text"),
    (" d/Del", "Delete todo and its children"),
    (" c \u{2190} \u{2192}", "Collapse / expand"),
    (" Tab", "Expand, or add a child"),
    (" D", "Delete completed todos"),
    (" i/a", "Focus the input"),
    (" q", "Quit"),
];

const INPUT_ROWS: &[(&str, &str)] = &[
    (" Enter", "Add todo"),
    (" Tab", "Indent under previous todo"),
    (" Esc", "Clear and leave"),
    (" \u{2191}", "Back to the list"),
];

const EDIT_ROWS: &[(&str, &str)] = &[
    (" Enter", "Save"),
    (" Esc", "Cancel (deletes if emptied)"),
    (" \u{2193}", "Focus the input"),
    (" Tab", "Add a child"),
];

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(60, 80, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(" Key Bindings", header_style)),
        Line::from(""),
    ];
    for (title, rows) in [
        (" List", ROWS),
        (" New todo", INPUT_ROWS),
        (" Editing", EDIT_ROWS),
    ] {
        lines.push(Line::from(Span::styled(title, header_style)));
        for (key, desc) in rows {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<12}", key), key_style),
                Span::styled(*desc, desc_style),
            ]));
        }
        lines.push(Line::from(""));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}

/// A rect of `percent_x` by `percent_y` centered in `r`
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
