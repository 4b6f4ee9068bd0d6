//! Debug harness scripting.
//!
//! A script is a line-oriented list of buffer operations:
//! - `insert TEXT` / `newline` to type at the cursor (`\n`, `\t`, `\s`, `\\`)
//! - `forward`, `backward`, `up`, `down`, `remove` with an optional count
//! - `row-start`, `row-end`, `column N`, `start`, `end`
//! - `reset`, `show`, and `expect row|column|index|size|text|at-end VALUE`
//!
//! The [`Runner`] applies the steps and records the buffer state after each.

mod parse;
mod render;
mod runner;

pub use parse::{
    Command, Expectation, ScriptError, Step, escape, parse_line, parse_script, unescape,
};
pub use render::render_state;
pub use runner::{BufferState, Runner, StepReport};

/// Built-in walkthrough run by `linebuf --demo`.
pub const DEMO_SCRIPT: &str = r"# Up and down
insert abc\nxyz
show
up
expect row 1
expect column 3
expect at-end false

# Complex editing
reset
insert hello\nworld
backward
remove
expect text hello\nworl
row-start
expect index 6
forward
insert W
expect text hello\nwWorl
expect row 2
expect column 2
expect index 8
";
