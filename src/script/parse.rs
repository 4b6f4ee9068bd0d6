//! Script parsing.

use std::fmt;

use thiserror::Error;

/// Script parsing or checking error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{name}`")]
    UnknownCommand { line: usize, name: String },

    #[error("line {line}: `{command}` requires an argument")]
    MissingArgument { line: usize, command: &'static str },

    #[error("line {line}: invalid value `{value}`")]
    InvalidValue { line: usize, value: String },

    #[error("line {line}: invalid escape `\\{escape}`")]
    InvalidEscape { line: usize, escape: char },

    #[error("line {line}: dangling `\\` at end of text")]
    DanglingEscape { line: usize },

    #[error("line {line}: cannot expect `{what}`")]
    UnknownExpectation { line: usize, what: String },

    #[error("line {line}: expected {what} to be {expected}, found {actual}")]
    ExpectationFailed {
        line: usize,
        what: &'static str,
        expected: String,
        actual: String,
    },
}

/// A buffer property checked by `expect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    Row(usize),
    Column(usize),
    Index(usize),
    Size(usize),
    Text(String),
    AtEnd(bool),
}

/// One harness command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Type text at the cursor
    Insert(String),
    Forward(usize),
    Backward(usize),
    Up(usize),
    Down(usize),
    Remove(usize),
    RowStart,
    RowEnd,
    Column(isize),
    Start,
    End,
    /// Replace the buffer with an empty one
    Reset,
    /// Record the current state without changing it
    Show,
    Expect(Expectation),
}

/// A command together with the script line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub line: usize,
    pub command: Command,
}

/// Parse a whole script. Blank lines and `#` comments are skipped.
pub fn parse_script(source: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (idx, text) in source.lines().enumerate() {
        let line = idx + 1;
        if let Some(command) = parse_line(line, text)? {
            steps.push(Step { line, command });
        }
    }
    Ok(steps)
}

/// Parse one script line, returning `None` for blank lines and comments.
pub fn parse_line(line: usize, text: &str) -> Result<Option<Command>, ScriptError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let (name, rest) = trimmed
        .split_once(char::is_whitespace)
        .map_or((trimmed, ""), |(name, rest)| (name, rest.trim()));

    let command = match name {
        "insert" | "i" => {
            if rest.is_empty() {
                return Err(ScriptError::MissingArgument {
                    line,
                    command: "insert",
                });
            }
            Command::Insert(unescape(line, rest)?)
        }
        "newline" | "nl" => Command::Insert("\n".to_string()),
        "forward" | "f" => Command::Forward(parse_count(line, rest)?),
        "backward" | "b" => Command::Backward(parse_count(line, rest)?),
        "up" | "u" => Command::Up(parse_count(line, rest)?),
        "down" | "d" => Command::Down(parse_count(line, rest)?),
        "remove" | "x" => Command::Remove(parse_count(line, rest)?),
        "row-start" | "home" => Command::RowStart,
        "row-end" | "eol" => Command::RowEnd,
        "column" | "col" => {
            if rest.is_empty() {
                return Err(ScriptError::MissingArgument {
                    line,
                    command: "column",
                });
            }
            Command::Column(parse_number(line, rest)?)
        }
        "start" => Command::Start,
        "end" => Command::End,
        "reset" => Command::Reset,
        "show" => Command::Show,
        "expect" => Command::Expect(parse_expectation(line, rest)?),
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                name: other.to_string(),
            });
        }
    };
    Ok(Some(command))
}

fn parse_expectation(line: usize, rest: &str) -> Result<Expectation, ScriptError> {
    let (what, value) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(what, value)| (what, value.trim()));
    if what.is_empty() {
        return Err(ScriptError::MissingArgument {
            line,
            command: "expect",
        });
    }
    // `expect text` with no value checks for an empty buffer.
    if what == "text" {
        return Ok(Expectation::Text(unescape(line, value)?));
    }
    if value.is_empty() {
        return Err(ScriptError::MissingArgument {
            line,
            command: "expect",
        });
    }
    match what {
        "row" => Ok(Expectation::Row(parse_number(line, value)?)),
        "column" | "col" => Ok(Expectation::Column(parse_number(line, value)?)),
        "index" => Ok(Expectation::Index(parse_number(line, value)?)),
        "size" => Ok(Expectation::Size(parse_number(line, value)?)),
        "at-end" => match value {
            "true" | "yes" => Ok(Expectation::AtEnd(true)),
            "false" | "no" => Ok(Expectation::AtEnd(false)),
            other => Err(ScriptError::InvalidValue {
                line,
                value: other.to_string(),
            }),
        },
        other => Err(ScriptError::UnknownExpectation {
            line,
            what: other.to_string(),
        }),
    }
}

fn parse_count(line: usize, rest: &str) -> Result<usize, ScriptError> {
    if rest.is_empty() {
        return Ok(1);
    }
    parse_number(line, rest)
}

fn parse_number<N: std::str::FromStr>(line: usize, value: &str) -> Result<N, ScriptError> {
    value.parse().map_err(|_| ScriptError::InvalidValue {
        line,
        value: value.to_string(),
    })
}

/// Decode `\n`, `\t`, `\s` (space) and `\\`.
pub fn unescape(line: usize, text: &str) -> Result<String, ScriptError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('s') => out.push(' '),
            Some('\\') => out.push('\\'),
            Some(escape) => return Err(ScriptError::InvalidEscape { line, escape }),
            None => return Err(ScriptError::DanglingEscape { line }),
        }
    }
    Ok(out)
}

/// Inverse of [`unescape`].
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            ' ' => out.push_str("\\s"),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert(text) if text == "\n" => write!(f, "newline"),
            Self::Insert(text) => write!(f, "insert {}", escape(text)),
            Self::Forward(n) => write!(f, "forward {n}"),
            Self::Backward(n) => write!(f, "backward {n}"),
            Self::Up(n) => write!(f, "up {n}"),
            Self::Down(n) => write!(f, "down {n}"),
            Self::Remove(n) => write!(f, "remove {n}"),
            Self::RowStart => write!(f, "row-start"),
            Self::RowEnd => write!(f, "row-end"),
            Self::Column(n) => write!(f, "column {n}"),
            Self::Start => write!(f, "start"),
            Self::End => write!(f, "end"),
            Self::Reset => write!(f, "reset"),
            Self::Show => write!(f, "show"),
            Self::Expect(expectation) => write!(f, "expect {expectation}"),
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row(n) => write!(f, "row {n}"),
            Self::Column(n) => write!(f, "column {n}"),
            Self::Index(n) => write!(f, "index {n}"),
            Self::Size(n) => write!(f, "size {n}"),
            Self::Text(text) => write!(f, "text {}", escape(text)),
            Self::AtEnd(flag) => write!(f, "at-end {flag}"),
        }
    }
}
