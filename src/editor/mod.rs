//! Cursor-tracking text buffer.
//!
//! Provides a linked-sequence-backed character buffer whose cursor always
//! knows its row, column and linear index, maintained incrementally as the
//! caller inserts, removes and navigates.

mod buffer;

pub use buffer::{CursorPosition, Direction, TextBuffer};
