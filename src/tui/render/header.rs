use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

use super::justify;

/// Title, namespace and completion counts
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let (total, done) = app.counts();

    let left = vec![
        Span::styled(
            " nestodo",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", app.session.key()),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ];
    let right = vec![Span::styled(
        format!("{}/{} done ", done, total),
        Style::default().fg(app.theme.dim).bg(bg),
    )];

    let line = Line::from(justify(left, right, area.width as usize, Style::default().bg(bg)));
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}
