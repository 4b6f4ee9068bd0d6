use std::fmt;

use crate::sequence::{LinkedSequence, Position};

/// Snapshot of the cursor's derived coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorPosition {
    /// One-based row.
    pub row: usize,
    /// Zero-based column within the row, in characters.
    pub column: usize,
    /// Zero-based count of characters before the cursor.
    pub index: usize,
}

impl CursorPosition {
    /// Cursor at row 1, column 0, index 0.
    pub const fn new() -> Self {
        Self {
            row: 1,
            column: 0,
            index: 0,
        }
    }

    pub const fn at(row: usize, column: usize, index: usize) -> Self {
        Self { row, column, index }
    }
}

impl Default for CursorPosition {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction for single-step cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A character buffer with a cursor that tracks its own coordinates.
///
/// The cursor sits *before* the character it denotes, or past the end of
/// the buffer. Between calls the following always hold:
///
/// - `index()` is the number of characters before the cursor;
/// - `row() - 1` is the number of newlines before the cursor;
/// - `column()` is the number of characters between the last newline
///   before the cursor (or the start) and the cursor.
///
/// Navigation and removal report boundary conditions through their `bool`
/// return value. A `false` return leaves every observable piece of state
/// untouched, except for [`down`](Self::down), which still moves to the end
/// of the current row.
pub struct TextBuffer {
    content: LinkedSequence<char>,
    cursor: Position,
    row: usize,
    column: usize,
    index: usize,
}

impl TextBuffer {
    /// Create an empty buffer with the cursor at row 1, column 0.
    pub fn new() -> Self {
        let content = LinkedSequence::new();
        let cursor = content.end();
        Self {
            content,
            cursor,
            row: 1,
            column: 0,
            index: 0,
        }
    }

    /// Create a buffer by typing `text`, leaving the cursor at the end.
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.insert_str(text);
        buffer
    }

    /// The cursor's current coordinates.
    pub const fn cursor(&self) -> CursorPosition {
        CursorPosition::at(self.row, self.column, self.index)
    }

    pub const fn row(&self) -> usize {
        self.row
    }

    pub const fn column(&self) -> usize {
        self.column
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    /// Total number of characters, newlines included.
    pub const fn len(&self) -> usize {
        self.content.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Whether the cursor is past the last character.
    pub fn is_at_end(&self) -> bool {
        self.cursor == self.content.end()
    }

    /// The character under the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end of the buffer.
    #[track_caller]
    pub fn data_at_cursor(&self) -> char {
        *self.content.get(self.cursor)
    }

    /// The character under the cursor, or `None` at the end.
    pub fn char_at_cursor(&self) -> Option<char> {
        (!self.is_at_end()).then(|| *self.content.get(self.cursor))
    }

    /// The full contents as one string.
    pub fn stringify(&self) -> String {
        self.content.iter().collect()
    }

    /// Number of rows (newlines plus one).
    pub fn row_count(&self) -> usize {
        self.content.iter().filter(|&&ch| ch == '\n').count() + 1
    }

    /// Content of a one-based row, without its newline.
    pub fn line_at(&self, row: usize) -> Option<String> {
        if row == 0 {
            return None;
        }
        self.stringify()
            .split('\n')
            .nth(row - 1)
            .map(ToOwned::to_owned)
    }

    /// Move the cursor one character forward.
    ///
    /// Returns `false` at the end of the buffer.
    pub fn forward(&mut self) -> bool {
        if self.is_at_end() {
            return false;
        }
        let ch = *self.content.get(self.cursor);
        self.cursor = self.content.next(self.cursor);
        self.index += 1;
        if ch == '\n' {
            self.row += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        true
    }

    /// Move the cursor one character backward.
    ///
    /// Returns `false` at the start of the buffer. Stepping back over a
    /// newline rescans the row just entered to find the new column.
    pub fn backward(&mut self) -> bool {
        if self.cursor == self.content.begin() {
            return false;
        }
        self.cursor = self.content.prev(self.cursor);
        self.index -= 1;
        if *self.content.get(self.cursor) == '\n' {
            self.row -= 1;
            self.column = self.compute_column();
        } else {
            self.column -= 1;
        }
        true
    }

    /// Insert a character before the cursor.
    ///
    /// The cursor keeps denoting the same character; only what precedes it
    /// changes.
    pub fn insert(&mut self, ch: char) {
        self.content.insert(self.cursor, ch);
        self.index += 1;
        if ch == '\n' {
            self.row += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }

    /// Insert every character of `text` before the cursor.
    pub fn insert_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.insert(ch);
        }
    }

    /// Remove the character under the cursor.
    ///
    /// The cursor moves onto the following character. Returns `false` at the
    /// end of the buffer.
    pub fn remove(&mut self) -> bool {
        if self.is_at_end() {
            return false;
        }
        let (removed, next) = self.content.remove(self.cursor);
        self.cursor = next;
        if removed == '\n' {
            // Two rows merged; derive the column from the merged row itself.
            self.column = self.compute_column();
            tracing::trace!(row = self.row, column = self.column, "merged rows");
        }
        true
    }

    /// Step the cursor in `direction`, returning whether it moved.
    pub fn move_cursor(&mut self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.backward(),
            Direction::Right => self.forward(),
            Direction::Up => self.up(),
            Direction::Down => self.down(),
        }
    }

    /// Move the cursor to column 0 of the current row.
    pub fn move_to_row_start(&mut self) {
        while self.column != 0 {
            self.backward();
        }
    }

    /// Move the cursor onto the current row's newline, or the end of the
    /// buffer on the last row.
    pub fn move_to_row_end(&mut self) {
        while self.char_at_cursor().is_some_and(|ch| ch != '\n') {
            self.forward();
        }
    }

    /// Move within the current row towards `target`.
    ///
    /// Negative targets are treated as 0. A target past the row's length
    /// stops on the row's newline (or the end of the buffer).
    pub fn move_to_column(&mut self, target: isize) {
        self.seek_column(usize::try_from(target).unwrap_or(0));
    }

    /// Move to the previous row, keeping the column where that row is long
    /// enough. Returns `false` on the first row.
    pub fn up(&mut self) -> bool {
        if self.row == 1 {
            tracing::trace!("up: already on the first row");
            return false;
        }
        let column = self.column;
        self.move_to_row_start();
        if self.cursor != self.content.begin() {
            self.backward();
        }
        self.move_to_row_start();
        self.seek_column(column);
        true
    }

    /// Move to the next row, keeping the column where that row is long
    /// enough.
    ///
    /// Returns `false` on the last row, in which case the cursor is left at
    /// the end of that row.
    pub fn down(&mut self) -> bool {
        let column = self.column;
        self.move_to_row_end();
        if self.char_at_cursor() != Some('\n') {
            tracing::trace!(row = self.row, "down: no following row");
            return false;
        }
        self.forward();
        self.seek_column(column);
        true
    }

    /// Move the cursor to the start of the buffer.
    pub fn move_to_start(&mut self) {
        while self.backward() {}
    }

    /// Move the cursor to the end of the buffer.
    pub fn move_to_end(&mut self) {
        while self.forward() {}
    }

    // --- Private helpers ---

    fn seek_column(&mut self, target: usize) {
        if target > self.column {
            while self.column < target && self.char_at_cursor().is_some_and(|ch| ch != '\n') {
                self.forward();
            }
        } else {
            while self.column > 0 && self.column > target {
                self.backward();
            }
        }
    }

    /// Count characters between the cursor and the preceding newline.
    fn compute_column(&self) -> usize {
        let begin = self.content.begin();
        let mut pos = self.cursor;
        let mut count = 0;
        while pos != begin {
            pos = self.content.prev(pos);
            if *self.content.get(pos) == '\n' {
                break;
            }
            count += 1;
        }
        count
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for &ch in &self.content {
            f.write_char(ch)?;
        }
        Ok(())
    }
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field("content", &format_args!("{} chars", self.content.len()))
            .field("cursor", &self.cursor())
            .field("at_end", &self.is_at_end())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a buffer by typing `text` one character at a time.
    fn build(text: &str) -> TextBuffer {
        let mut buf = TextBuffer::new();
        for ch in text.chars() {
            buf.insert(ch);
        }
        buf
    }

    /// Walk from the start until the cursor sits on `target`.
    fn seek_char(buf: &mut TextBuffer, target: char) {
        buf.move_to_start();
        while buf.char_at_cursor() != Some(target) {
            assert!(buf.forward(), "{target:?} not found");
        }
    }

    // --- Construction and basic queries ---

    #[test]
    fn test_constructor_invariants() {
        let buf = TextBuffer::new();
        assert!(buf.is_at_end());
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.cursor(), CursorPosition::at(1, 0, 0));
    }

    #[test]
    fn test_from_text_leaves_cursor_at_end() {
        let buf = TextBuffer::from_text("hello\nworld");
        assert_eq!(buf.stringify(), "hello\nworld");
        assert!(buf.is_at_end());
        assert_eq!(buf.cursor(), CursorPosition::at(2, 5, 11));
    }

    #[test]
    fn test_display_matches_stringify() {
        let buf = build("a\nb");
        assert_eq!(buf.to_string(), buf.stringify());
    }

    #[test]
    fn test_line_at_and_row_count() {
        let buf = build("ab\n\ncd");
        assert_eq!(buf.row_count(), 3);
        assert_eq!(buf.line_at(1), Some("ab".to_string()));
        assert_eq!(buf.line_at(2), Some(String::new()));
        assert_eq!(buf.line_at(3), Some("cd".to_string()));
        assert_eq!(buf.line_at(4), None);
        assert_eq!(buf.line_at(0), None);
    }

    // --- Insertion ---

    #[test]
    fn test_insert_at_end_and_order() {
        let mut buf = build("ab\nc");
        buf.move_to_end();
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.stringify(), "ab\nc");
        assert!(buf.is_at_end());
        assert_eq!(buf.cursor(), CursorPosition::at(2, 1, 4));
    }

    #[test]
    fn test_insert_in_middle_cursor_stays() {
        let mut buf = build("abcd");
        seek_char(&mut buf, 'c');
        let before = buf.cursor();
        buf.insert('X');
        assert_eq!(buf.data_at_cursor(), 'c');
        assert_eq!(buf.index(), before.index + 1);
        assert_eq!(buf.column(), before.column + 1);
        assert_eq!(buf.row(), before.row);
        assert_eq!(buf.stringify(), "abXcd");
    }

    #[test]
    fn test_insert_various_positions() {
        let mut buf = TextBuffer::new();
        buf.insert('a');
        assert_eq!(buf.index(), 1);
        buf.insert('b');
        assert_eq!(buf.stringify(), "ab");
        assert_eq!(buf.index(), 2);

        buf.move_to_start();
        buf.insert('z');
        assert_eq!(buf.stringify(), "zab");
        assert_eq!(buf.index(), 1);

        buf.insert('x');
        assert_eq!(buf.stringify(), "zxab");
        assert_eq!(buf.index(), 2);
        assert_eq!(buf.data_at_cursor(), 'a');
    }

    #[test]
    fn test_insert_newline_splits_row() {
        let mut buf = build("hello world");
        buf.move_to_start();
        buf.move_to_column(5);
        buf.insert('\n');
        assert_eq!(buf.stringify(), "hello\n world");
        assert_eq!(buf.cursor(), CursorPosition::at(2, 0, 6));
        assert_eq!(buf.data_at_cursor(), ' ');
        buf.move_to_row_end();
        assert_eq!(buf.column(), 6);
        assert!(buf.is_at_end());
    }

    #[test]
    fn test_insert_str_multiline() {
        let mut buf = TextBuffer::new();
        buf.insert_str("one\ntwo\nthree");
        assert_eq!(buf.cursor(), CursorPosition::at(3, 5, 13));
    }

    // --- Removal ---

    #[test]
    fn test_remove_at_end_is_noop() {
        let mut buf = build("xy");
        let before = buf.cursor();
        assert!(!buf.remove());
        assert_eq!(buf.cursor(), before);
        assert_eq!(buf.stringify(), "xy");
    }

    #[test]
    fn test_remove_nonnewline_and_index() {
        let mut buf = build("xyz");
        buf.move_to_start();
        assert!(buf.remove());
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.data_at_cursor(), 'y');
        assert_eq!(buf.cursor(), CursorPosition::at(1, 0, 0));
    }

    #[test]
    fn test_remove_newline_merges_rows() {
        let mut buf = build("line1\nline2");
        seek_char(&mut buf, '\n');
        let row = buf.row();
        assert!(buf.remove());
        assert_eq!(buf.stringify(), "line1line2");
        assert_eq!(buf.row(), row);
        assert_eq!(buf.column(), 5);
        assert_eq!(buf.index(), 5);
        assert_eq!(buf.data_at_cursor(), 'l');
        assert_eq!(buf.row_count(), 1);
    }

    #[test]
    fn test_remove_newline_on_later_row() {
        let mut buf = build("a\nbcd\nef");
        buf.move_to_start();
        assert!(buf.down());
        buf.move_to_row_end();
        assert_eq!(buf.cursor(), CursorPosition::at(2, 3, 5));
        assert!(buf.remove());
        assert_eq!(buf.stringify(), "a\nbcdef");
        assert_eq!(buf.cursor(), CursorPosition::at(2, 3, 5));
        buf.move_to_row_end();
        assert_eq!(buf.column(), 5);
    }

    #[test]
    fn test_remove_various_positions() {
        let mut buf = build("abcde");
        buf.move_to_start();
        assert!(buf.remove());
        assert_eq!(buf.stringify(), "bcde");
        assert_eq!(buf.index(), 0);

        buf.forward();
        assert!(buf.remove());
        assert_eq!(buf.stringify(), "bde");

        while buf.len() > 1 {
            buf.backward();
            buf.remove();
        }
        assert_eq!(buf.len(), 1);

        buf.move_to_start();
        assert!(buf.remove());
        assert!(buf.is_at_end());
        assert!(buf.is_empty());
        assert!(!buf.remove());
    }

    #[test]
    fn test_boundary_single_char_and_empty() {
        let mut buf = TextBuffer::new();
        assert!(!buf.forward());
        assert!(!buf.backward());
        assert!(!buf.remove());
        buf.insert('z');
        buf.move_to_start();
        assert!(buf.remove());
        assert!(buf.is_at_end());
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.cursor(), CursorPosition::at(1, 0, 0));
    }

    // --- Forward / backward ---

    #[test]
    fn test_forward_backward_across_newline() {
        let mut buf = build("ab\ncd");
        assert!(buf.backward());
        assert!(buf.backward());
        assert_eq!(buf.cursor(), CursorPosition::at(2, 0, 3));
        assert!(buf.backward());
        assert_eq!(buf.data_at_cursor(), '\n');
        assert_eq!(buf.cursor(), CursorPosition::at(1, 2, 2));
        buf.move_to_start();
        assert_eq!(buf.cursor(), CursorPosition::at(1, 0, 0));
    }

    #[test]
    fn test_forward_backward_counts() {
        let mut buf = build("12\n34\n56");
        let mut count = 0;
        while buf.backward() {
            count += 1;
        }
        assert_eq!(count, 8);
        assert_eq!(buf.index(), 0);

        count = 0;
        while buf.forward() {
            count += 1;
        }
        assert_eq!(count, 8);
        assert!(buf.is_at_end());
        assert!(!buf.forward());
    }

    #[test]
    fn test_failed_moves_leave_state_unchanged() {
        let mut buf = build("ab");
        let at_end = buf.cursor();
        assert!(!buf.forward());
        assert_eq!(buf.cursor(), at_end);

        buf.move_to_start();
        let at_start = buf.cursor();
        assert!(!buf.backward());
        assert!(!buf.up());
        assert_eq!(buf.cursor(), at_start);
        assert_eq!(buf.data_at_cursor(), 'a');
    }

    #[test]
    fn test_get_row_comprehensive() {
        let mut buf = build("line1\nline2\nline3");
        buf.move_to_start();
        for _ in 0..5 {
            assert_eq!(buf.row(), 1);
            buf.forward();
        }
        assert_eq!(buf.row(), 1);
        buf.forward();
        assert_eq!(buf.row(), 2);
        buf.move_to_row_end();
        assert_eq!(buf.row(), 2);
        buf.forward();
        assert_eq!(buf.row(), 3);
        buf.move_to_end();
        assert_eq!(buf.row(), 3);
    }

    #[test]
    fn test_get_column_comprehensive() {
        let mut buf = build("abc\ndefgh");
        buf.move_to_start();
        for expected in 1..=3 {
            buf.forward();
            assert_eq!(buf.column(), expected);
        }
        buf.forward();
        assert_eq!(buf.column(), 0);
        for expected in 1..=5 {
            buf.forward();
            assert_eq!(buf.column(), expected);
        }
    }

    #[test]
    fn test_get_index_comprehensive() {
        let mut buf = build("ab\ncd\nef");
        buf.move_to_start();
        for expected in 1..=8 {
            buf.forward();
            assert_eq!(buf.index(), expected);
        }
        assert!(buf.is_at_end());
        buf.backward();
        assert_eq!(buf.index(), 7);
        buf.backward();
        assert_eq!(buf.index(), 6);
    }

    #[test]
    fn test_backward_onto_empty_row_newline() {
        let mut buf = build("ab\n\ncd");
        buf.move_to_start();
        buf.down();
        assert_eq!(buf.cursor(), CursorPosition::at(2, 0, 3));
        buf.forward();
        assert_eq!(buf.cursor(), CursorPosition::at(3, 0, 4));
        buf.backward();
        assert_eq!(buf.cursor(), CursorPosition::at(2, 0, 3));
        buf.backward();
        assert_eq!(buf.cursor(), CursorPosition::at(1, 2, 2));
    }

    // --- Row navigation ---

    #[test]
    fn test_move_to_row_operations() {
        let mut buf = build("short\nvery_long_line\nend");
        buf.move_to_start();

        buf.move_to_row_end();
        assert_eq!(buf.data_at_cursor(), '\n');
        assert_eq!(buf.column(), 5);

        buf.move_to_row_start();
        assert_eq!(buf.column(), 0);
        assert_eq!(buf.data_at_cursor(), 's');

        for _ in 0..6 {
            buf.forward();
        }
        assert_eq!(buf.row(), 2);
        buf.move_to_row_end();
        assert_eq!(buf.data_at_cursor(), '\n');
        assert_eq!(buf.column(), 14);
    }

    #[test]
    fn test_move_to_column_edge_cases() {
        let mut buf = build("abc\ndefghij\nxy");
        buf.move_to_start();

        buf.move_to_column(2);
        assert_eq!(buf.column(), 2);
        assert_eq!(buf.data_at_cursor(), 'c');

        buf.move_to_column(100);
        assert_eq!(buf.data_at_cursor(), '\n');
        assert_eq!(buf.column(), 3);

        buf.forward();
        assert_eq!(buf.row(), 2);
        buf.move_to_column(5);
        assert_eq!(buf.column(), 5);

        buf.move_to_column(0);
        assert_eq!(buf.column(), 0);
    }

    #[test]
    fn test_move_to_column_negative_clamps_to_zero() {
        let mut buf = build("abc\ndef");
        buf.move_to_column(-4);
        assert_eq!(buf.cursor(), CursorPosition::at(2, 0, 4));
    }

    #[test]
    fn test_move_to_column_on_last_row_stops_at_end() {
        let mut buf = build("abc\nxy");
        buf.move_to_row_start();
        buf.move_to_column(50);
        assert!(buf.is_at_end());
        assert_eq!(buf.column(), 2);
    }

    #[test]
    fn test_up_down_comprehensive() {
        let mut buf = build("123\n4567\n89");
        buf.move_to_start();
        assert!(!buf.up());
        assert_eq!(buf.row(), 1);

        buf.move_to_column(2);
        assert!(buf.down());
        assert_eq!((buf.row(), buf.column()), (2, 2));

        assert!(buf.down());
        assert_eq!((buf.row(), buf.column()), (3, 2));
        assert!(buf.is_at_end());

        assert!(!buf.down());
        assert_eq!(buf.row(), 3);

        assert!(buf.up());
        assert_eq!((buf.row(), buf.column()), (2, 2));

        assert!(buf.up());
        assert_eq!((buf.row(), buf.column()), (1, 2));
        assert_eq!(buf.data_at_cursor(), '3');
    }

    #[test]
    fn test_up_clamps_to_shorter_row() {
        let mut buf = build("hi\nhello");
        assert_eq!(buf.column(), 5);
        assert!(buf.up());
        assert_eq!(buf.cursor(), CursorPosition::at(1, 2, 2));
        assert_eq!(buf.data_at_cursor(), '\n');
    }

    #[test]
    fn test_up_from_last_row_reaches_first() {
        let mut buf = build("abc\nxyz");
        assert_eq!(buf.cursor(), CursorPosition::at(2, 3, 7));
        assert!(buf.up());
        assert_eq!(buf.cursor(), CursorPosition::at(1, 3, 3));
        assert!(!buf.is_at_end());
    }

    #[test]
    fn test_up_into_empty_first_row() {
        let mut buf = build("\nabc");
        assert!(buf.up());
        assert_eq!(buf.cursor(), CursorPosition::at(1, 0, 0));
        assert_eq!(buf.data_at_cursor(), '\n');
    }

    #[test]
    fn test_down_on_last_row_moves_to_row_end() {
        let mut buf = build("abc\nxyz");
        buf.move_to_row_start();
        assert!(!buf.down());
        assert!(buf.is_at_end());
        assert_eq!(buf.cursor(), CursorPosition::at(2, 3, 7));
    }

    #[test]
    fn test_down_clamps_to_shorter_row() {
        let mut buf = build("hello\nhi");
        buf.move_to_start();
        buf.move_to_column(4);
        assert!(buf.down());
        assert_eq!(buf.cursor(), CursorPosition::at(2, 2, 8));
        assert!(buf.is_at_end());
    }

    #[test]
    fn test_up_down_preserve_column_and_boundaries() {
        let mut buf = build("short\nverylong\nend");
        buf.move_to_row_start();
        buf.move_to_column(3);
        assert_eq!(buf.column(), 3);
        while buf.up() {}
        assert_eq!(buf.row(), 1);
        assert_eq!(buf.column(), 3);
        assert!(!buf.up());
    }

    #[test]
    fn test_move_cursor_dispatches() {
        let mut buf = build("ab\ncd");
        assert!(buf.move_cursor(Direction::Left));
        assert!(buf.move_cursor(Direction::Up));
        assert_eq!(buf.cursor(), CursorPosition::at(1, 1, 1));
        assert!(buf.move_cursor(Direction::Right));
        assert!(buf.move_cursor(Direction::Down));
        assert_eq!(buf.cursor(), CursorPosition::at(2, 2, 5));
        assert!(!buf.move_cursor(Direction::Right));
    }

    // --- Queries ---

    #[test]
    fn test_is_at_end_and_data_at_cursor_behavior() {
        let mut buf = build("x");
        assert!(buf.is_at_end());
        assert_eq!(buf.char_at_cursor(), None);
        buf.move_to_start();
        assert!(!buf.is_at_end());
        assert_eq!(buf.data_at_cursor(), 'x');
        assert_eq!(buf.char_at_cursor(), Some('x'));
    }

    #[test]
    #[should_panic(expected = "past-the-end")]
    fn test_data_at_cursor_at_end_panics() {
        let buf = build("x");
        let _ = buf.data_at_cursor();
    }

    #[test]
    fn test_debug_does_not_dump_contents() {
        let buf = build("secret");
        let debug = format!("{buf:?}");
        assert!(debug.contains("6 chars"));
        assert!(!debug.contains("secret"));
    }

    // --- Complex editing sequences ---

    #[test]
    fn test_complex_editing() {
        let mut buf = build("hello\nworld");
        assert_eq!(buf.cursor(), CursorPosition::at(2, 5, 11));

        buf.backward();
        assert_eq!(buf.cursor(), CursorPosition::at(2, 4, 10));

        buf.remove();
        assert_eq!(buf.stringify(), "hello\nworl");
        assert_eq!(buf.cursor(), CursorPosition::at(2, 4, 10));

        buf.move_to_row_start();
        assert_eq!(buf.cursor(), CursorPosition::at(2, 0, 6));

        buf.forward();
        buf.insert('W');
        assert_eq!(buf.stringify(), "hello\nwWorl");
        assert_eq!(buf.cursor(), CursorPosition::at(2, 2, 8));
    }

    #[test]
    fn test_big_buffer() {
        let mut buf = TextBuffer::new();
        for i in 0..100u8 {
            buf.insert(char::from(b'a' + i % 26));
            if (i + 1) % 10 == 0 {
                buf.insert('\n');
            }
        }
        assert_eq!(buf.len(), 110);
        assert_eq!(buf.row(), 11);

        buf.move_to_start();
        for _ in 0..50 {
            buf.forward();
        }
        assert_eq!(buf.index(), 50);

        for _ in 0..10 {
            buf.remove();
        }
        assert_eq!(buf.len(), 100);

        buf.move_to_end();
        assert!(buf.is_at_end());
        assert_eq!(buf.index(), buf.len());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Insert(char),
            Newline,
            Remove,
            Forward,
            Backward,
            Up,
            Down,
            RowStart,
            RowEnd,
            Column(isize),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                4 => prop::char::range('a', 'e').prop_map(Op::Insert),
                1 => Just(Op::Newline),
                2 => Just(Op::Remove),
                2 => Just(Op::Forward),
                2 => Just(Op::Backward),
                1 => Just(Op::Up),
                1 => Just(Op::Down),
                1 => Just(Op::RowStart),
                1 => Just(Op::RowEnd),
                1 => (-3isize..12).prop_map(Op::Column),
            ]
        }

        /// Recompute the coordinates from scratch for the cursor at `index`.
        fn expected_cursor(text: &str, index: usize) -> CursorPosition {
            let before: Vec<char> = text.chars().take(index).collect();
            let row = before.iter().filter(|&&ch| ch == '\n').count() + 1;
            let column = before.iter().rev().take_while(|&&ch| ch != '\n').count();
            CursorPosition::at(row, column, index)
        }

        proptest! {
            #[test]
            fn coordinates_match_rescan(ops in prop::collection::vec(op_strategy(), 0..200)) {
                let mut buf = TextBuffer::new();
                let mut oracle: Vec<char> = Vec::new();

                for op in ops {
                    match op {
                        Op::Insert(ch) => {
                            oracle.insert(buf.index(), ch);
                            buf.insert(ch);
                        }
                        Op::Newline => {
                            oracle.insert(buf.index(), '\n');
                            buf.insert('\n');
                        }
                        Op::Remove => {
                            let index = buf.index();
                            if buf.remove() {
                                oracle.remove(index);
                            }
                        }
                        Op::Forward => { buf.forward(); }
                        Op::Backward => { buf.backward(); }
                        Op::Up => { buf.up(); }
                        Op::Down => { buf.down(); }
                        Op::RowStart => buf.move_to_row_start(),
                        Op::RowEnd => buf.move_to_row_end(),
                        Op::Column(target) => buf.move_to_column(target),
                    }

                    let text: String = oracle.iter().collect();
                    prop_assert_eq!(buf.stringify(), text.clone());
                    prop_assert_eq!(buf.len(), oracle.len());
                    prop_assert!(buf.index() <= buf.len());
                    prop_assert_eq!(buf.cursor(), expected_cursor(&text, buf.index()));
                    prop_assert_eq!(buf.char_at_cursor(), oracle.get(buf.index()).copied());
                }
            }

            #[test]
            fn forward_then_backward_restores(text in "[a-c\n]{1,40}", steps in 0usize..40) {
                let mut buf = TextBuffer::from_text(&text);
                buf.move_to_start();
                for _ in 0..steps.min(text.chars().count() - 1) {
                    buf.forward();
                }
                let before = (buf.cursor(), buf.char_at_cursor());
                prop_assert!(buf.forward());
                prop_assert!(buf.backward());
                prop_assert_eq!((buf.cursor(), buf.char_at_cursor()), before);
            }

            #[test]
            fn down_then_up_restores_when_rows_are_long_enough(
                rows in prop::collection::vec("[a-z]{0,8}", 3..6),
                row in 1usize..3,
                column in 0usize..8,
            ) {
                let mut buf = TextBuffer::from_text(&rows.join("\n"));
                buf.move_to_start();
                for _ in 1..row {
                    buf.down();
                }
                buf.move_to_column(isize::try_from(column).unwrap());
                let start = buf.cursor();
                let next_len = rows[row].chars().count();

                prop_assert!(buf.down());
                prop_assert_eq!(buf.row(), start.row + 1);
                prop_assert_eq!(buf.column(), start.column.min(next_len));
                prop_assert!(buf.up());
                if next_len >= start.column {
                    prop_assert_eq!(buf.cursor(), start);
                }
            }

            #[test]
            fn up_then_down_restores_when_rows_are_long_enough(
                rows in prop::collection::vec("[a-z]{0,8}", 3..6),
                row in 2usize..4,
                column in 0usize..8,
            ) {
                let mut buf = TextBuffer::from_text(&rows.join("\n"));
                buf.move_to_start();
                for _ in 1..row {
                    prop_assert!(buf.down());
                }
                buf.move_to_column(isize::try_from(column).unwrap());
                let start = buf.cursor();
                let prev_len = rows[row - 2].chars().count();

                prop_assert!(buf.up());
                prop_assert_eq!(buf.row(), start.row - 1);
                prop_assert_eq!(buf.column(), start.column.min(prev_len));
                prop_assert!(buf.down());
                prop_assert_eq!(buf.row(), start.row);
                if prev_len >= start.column {
                    prop_assert_eq!(buf.cursor(), start);
                } else {
                    prop_assert_eq!(buf.column(), prev_len);
                }
            }

            #[test]
            fn move_to_column_never_passes_row_end(
                rows in prop::collection::vec("[a-z]{0,8}", 1..5),
                column in 0isize..20,
            ) {
                let mut buf = TextBuffer::from_text(&rows.join("\n"));
                buf.move_to_start();
                loop {
                    let row_len = rows[buf.row() - 1].chars().count();
                    buf.move_to_column(column);
                    let expected = usize::try_from(column).unwrap().min(row_len);
                    prop_assert_eq!(buf.column(), expected);
                    if expected == row_len {
                        prop_assert!(buf.is_at_end() || buf.data_at_cursor() == '\n');
                    }
                    if !buf.down() {
                        break;
                    }
                }
            }
        }
    }
}
