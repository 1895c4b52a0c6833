use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};

use super::justify;

fn key_hints(mode: Mode) -> &'static str {
    match mode {
        Mode::Navigate => "space toggle  e edit  d delete  tab sub  ? help",
        Mode::Input => "enter add  tab indent  esc done",
        Mode::Edit => "enter save  esc cancel  \u{2193} input",
    }
}

/// Render the status row (bottom of screen): message on the left, key
/// hints on the right
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let left = match &app.status_message {
        Some(msg) if app.status_error => vec![Span::styled(
            format!(" {}", msg),
            Style::default().fg(app.theme.error).bg(bg),
        )],
        Some(msg) => vec![Span::styled(format!(" {}", msg), dim)],
        None => Vec::new(),
    };
    let right = if app.show_key_hints {
        vec![Span::styled(format!("{} ", key_hints(app.mode)), dim)]
    } else {
        Vec::new()
    };

    let line = Line::from(justify(left, right, area.width as usize, Style::default().bg(bg)));
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}
