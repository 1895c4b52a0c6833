use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const TAB_CELLS: usize = 4;

fn cell_width(grapheme: &str) -> usize {
    if grapheme == "\t" {
        TAB_CELLS
    } else {
        UnicodeWidthStr::width(grapheme)
    }
}

/// Width of `s` in terminal cells
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(cell_width).sum()
}

/// Cut `s` down to at most `max_cells` cells, ending in `…` when shortened.
/// Never splits a grapheme cluster.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    let Some(budget) = max_cells.checked_sub(1) else {
        return String::new();
    };
    let mut used = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let w = cell_width(g);
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Byte offset of the grapheme boundary after `at`, if any
pub fn next_grapheme_boundary(s: &str, at: usize) -> Option<usize> {
    let rest = s.get(at..).filter(|r| !r.is_empty())?;
    let first = rest.graphemes(true).next()?;
    Some(at + first.len())
}

/// Byte offset of the grapheme boundary before `at`, if any
pub fn prev_grapheme_boundary(s: &str, at: usize) -> Option<usize> {
    let head = s.get(..at).filter(|h| !h.is_empty())?;
    let last = head.graphemes(true).next_back()?;
    Some(at - last.len())
}

/// Start of the word at or before `at`, skipping whitespace first
pub fn word_boundary_left(s: &str, at: usize) -> usize {
    let Some(head) = s.get(..at) else {
        return 0;
    };
    let trimmed = head.trim_end();
    match trimmed.rfind(char::is_whitespace) {
        Some(pos) => {
            let ws = trimmed[pos..].chars().next().map_or(1, char::len_utf8);
            pos + ws
        }
        None => 0,
    }
}

/// Start of the next word after `at`
pub fn word_boundary_right(s: &str, at: usize) -> usize {
    let Some(tail) = s.get(at..) else {
        return s.len();
    };
    let word_end = tail.find(char::is_whitespace).unwrap_or(tail.len());
    let after = &tail[word_end..];
    let gap = after.len() - after.trim_start().len();
    at + word_end + gap
}
