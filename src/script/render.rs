//! Plain-text rendering of the cursor for the harness.

use std::fmt::Write;

use unicode_width::UnicodeWidthChar;

use crate::editor::TextBuffer;

/// Render a status line plus the cursor's row with a caret under the cursor.
///
/// ```text
/// row 2, col 1, index 4, size 4, at end
/// 2 | c
///   |  ^
/// ```
pub fn render_state(buffer: &TextBuffer) -> String {
    let cursor = buffer.cursor();
    let mut out = format!(
        "row {}, col {}, index {}, size {}, ",
        cursor.row,
        cursor.column,
        cursor.index,
        buffer.len()
    );
    match buffer.char_at_cursor() {
        Some(ch) => {
            let _ = writeln!(out, "on {ch:?}");
        }
        None => out.push_str("at end\n"),
    }

    let line = buffer.line_at(cursor.row).unwrap_or_default();
    let gutter = cursor.row.to_string().len();
    let visible: String = line.chars().map(visible_char).collect();
    let caret_offset: usize = line
        .chars()
        .take(cursor.column)
        .map(|ch| visible_char(ch).width().unwrap_or(1))
        .sum();

    let _ = writeln!(out, "{:>gutter$} | {}", cursor.row, visible.trim_end());
    let _ = writeln!(out, "{:>gutter$} | {}^", "", " ".repeat(caret_offset));
    out
}

/// Control characters get a visible stand-in so the caret stays aligned.
fn visible_char(ch: char) -> char {
    if ch.is_control() { '·' } else { ch }
}
