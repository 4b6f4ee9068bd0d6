// Transitive dependency version mismatches we can't control
#![allow(clippy::multiple_crate_versions)]

//! # Linebuf
//!
//! A doubly linked sequence container and a line-aware text buffer built on it.
//!
//! ```
//! use linebuf::LinkedSequence;
//!
//! let mut seq: LinkedSequence<i32> = [1, 3].into_iter().collect();
//! let pos = seq.next(seq.begin());
//! seq.insert(pos, 2);
//! assert_eq!(seq.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
//! ```
//!
//! ## Modules
//!
//! - [`sequence`]: Generic linked sequence with stable positions
//! - [`editor`]: Text buffer tracking row, column and index of a cursor
//! - [`script`]: Scripted debug harness over the text buffer
//! - [`config`]: Harness defaults stored as flag files
//! - [`perf`]: Timing scopes and trace log

pub mod config;
pub mod editor;
pub mod perf;
pub mod script;
pub mod sequence;

pub use editor::{CursorPosition, Direction, TextBuffer};
pub use sequence::{LinkedSequence, Position};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::editor::{CursorPosition, Direction, TextBuffer};
    pub use crate::script::{Runner, ScriptError, parse_script};
    pub use crate::sequence::{LinkedSequence, Position};
}
