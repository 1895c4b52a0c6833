use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::store::{MemoryStore, Store};
use crate::model::Config;
use crate::ops::Session;
use crate::tui::app::App;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over an in-memory store seeded with `raw` JSON under the
/// default key
pub fn app_with(raw: &str) -> App {
    let store: Box<dyn Store> = Box::new(MemoryStore::new().with_raw("todoList", raw));
    App::new(Session::open(store, "todoList"), &Config::default())
}

/// groceries
/// ├── milk
/// └── eggs [x]
/// laundry
pub const NESTED_JSON: &str = r#"[
  {"id": "a", "text": "groceries", "children": [
    {"id": "b", "text": "milk"},
    {"id": "d", "text": "eggs", "completed": true}
  ]},
  {"id": "e", "text": "laundry"}
]"#;
