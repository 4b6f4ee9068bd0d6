//! Applies parsed scripts to a buffer, recording the state after each step.

use serde::Serialize;

use crate::editor::TextBuffer;
use crate::perf;

use super::parse::{Command, Expectation, ScriptError, Step, escape};

/// Observable buffer state at one point of a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BufferState {
    pub row: usize,
    pub column: usize,
    pub index: usize,
    pub size: usize,
    pub at_end: bool,
    pub cursor_char: Option<char>,
    pub text: String,
}

impl BufferState {
    pub fn capture(buffer: &TextBuffer) -> Self {
        Self {
            row: buffer.row(),
            column: buffer.column(),
            index: buffer.index(),
            size: buffer.len(),
            at_end: buffer.is_at_end(),
            cursor_char: buffer.char_at_cursor(),
            text: buffer.stringify(),
        }
    }
}

/// Outcome of one script step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub line: usize,
    pub command: String,
    /// `false` when a movement or removal hit a boundary.
    pub succeeded: bool,
    pub state: BufferState,
}

/// Drives a [`TextBuffer`] through script steps.
#[derive(Debug, Default)]
pub struct Runner {
    buffer: TextBuffer,
    reports: Vec<StepReport>,
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn reports(&self) -> &[StepReport] {
        &self.reports
    }

    pub fn into_reports(self) -> Vec<StepReport> {
        self.reports
    }

    /// Apply every step in order, stopping at the first failed expectation.
    pub fn run(&mut self, steps: &[Step]) -> Result<(), ScriptError> {
        for step in steps {
            self.apply(step)?;
        }
        Ok(())
    }

    /// Apply a single step and record its report.
    pub fn apply(&mut self, step: &Step) -> Result<&StepReport, ScriptError> {
        let succeeded = match &step.command {
            Command::Insert(text) => {
                self.buffer.insert_str(text);
                true
            }
            Command::Forward(count) => repeat(*count, || self.buffer.forward()),
            Command::Backward(count) => repeat(*count, || self.buffer.backward()),
            Command::Up(count) => repeat(*count, || self.buffer.up()),
            Command::Down(count) => repeat(*count, || self.buffer.down()),
            Command::Remove(count) => repeat(*count, || self.buffer.remove()),
            Command::RowStart => {
                self.buffer.move_to_row_start();
                true
            }
            Command::RowEnd => {
                self.buffer.move_to_row_end();
                true
            }
            Command::Column(target) => {
                self.buffer.move_to_column(*target);
                true
            }
            Command::Start => {
                self.buffer.move_to_start();
                true
            }
            Command::End => {
                self.buffer.move_to_end();
                true
            }
            Command::Reset => {
                self.buffer = TextBuffer::new();
                true
            }
            Command::Show => true,
            Command::Expect(expectation) => {
                self.check(step.line, expectation)?;
                true
            }
        };

        let report = StepReport {
            line: step.line,
            command: step.command.to_string(),
            succeeded,
            state: BufferState::capture(&self.buffer),
        };
        tracing::debug!(
            line = report.line,
            command = %report.command,
            succeeded,
            row = report.state.row,
            column = report.state.column,
            index = report.state.index,
            "applied step"
        );
        if perf::is_trace_log_enabled() {
            perf::log_event(
                "script.step",
                format!(
                    "line {} `{}` ok={} row={} col={} index={}",
                    report.line,
                    report.command,
                    succeeded,
                    report.state.row,
                    report.state.column,
                    report.state.index
                ),
            );
        }
        self.reports.push(report);
        Ok(&self.reports[self.reports.len() - 1])
    }

    fn check(&self, line: usize, expectation: &Expectation) -> Result<(), ScriptError> {
        let buffer = &self.buffer;
        let (what, expected, actual) = match expectation {
            Expectation::Row(row) => ("row", row.to_string(), buffer.row().to_string()),
            Expectation::Column(column) => {
                ("column", column.to_string(), buffer.column().to_string())
            }
            Expectation::Index(index) => ("index", index.to_string(), buffer.index().to_string()),
            Expectation::Size(size) => ("size", size.to_string(), buffer.len().to_string()),
            Expectation::Text(text) => ("text", escape(text), escape(&buffer.stringify())),
            Expectation::AtEnd(at_end) => (
                "at-end",
                at_end.to_string(),
                buffer.is_at_end().to_string(),
            ),
        };
        if expected == actual {
            Ok(())
        } else {
            Err(ScriptError::ExpectationFailed {
                line,
                what,
                expected,
                actual,
            })
        }
    }
}

/// Run `step` up to `count` times, stopping at the first failure.
fn repeat(count: usize, mut step: impl FnMut() -> bool) -> bool {
    (0..count).all(|_| step())
}
