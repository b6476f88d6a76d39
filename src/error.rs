//! Error handling and formatting for XY
//!
//! Every fallible operation in the interpreter returns [`Result`]. The
//! [`ErrorHandler`] is only used at the top level, where it keeps the first
//! unrecovered error around until it is displayed or flushed.

use colored::Colorize;
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::lexer::SourcePosition;

/// Result type used throughout the interpreter
pub type Result<T> = std::result::Result<T, Error>;

/// The class of an error, shown as the first word of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed number literal or unterminated string
    Lexical,
    /// Unexpected token, missing separator or terminator
    Syntax,
    /// A symbol that was never bound, reported when it is evaluated
    Resolution,
    /// No overload accepted the arguments
    Dispatch,
    /// Operator, unary or argument type mismatch
    Type,
    /// Division by zero, calling a non-callable value, explicit `die`
    Runtime,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Lexical => "Lexical",
            ErrorKind::Syntax => "Syntax",
            ErrorKind::Resolution => "Resolution",
            ErrorKind::Dispatch => "Dispatch",
            ErrorKind::Type => "Type",
            ErrorKind::Runtime => "Runtime",
        };
        f.write_str(name)
    }
}

/// An interpreter error: class, optional source position and message
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} error{}: {message}", located(.position))]
pub struct Error {
    pub kind: ErrorKind,
    pub position: Option<SourcePosition>,
    pub message: String,
}

fn located(position: &Option<SourcePosition>) -> String {
    match position {
        Some(position) => format!(" [{}]", position),
        None => String::new(),
    }
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            position: None,
            message: message.into(),
        }
    }

    /// Attach a source position to the error
    pub fn at(mut self, position: SourcePosition) -> Self {
        self.position = Some(position);
        self
    }

    pub fn lexical(position: SourcePosition, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Lexical, message).at(position)
    }

    pub fn syntax(position: SourcePosition, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, message).at(position)
    }

    pub fn resolution(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Resolution, message)
    }

    pub fn dispatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Dispatch, message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Type, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Runtime, message)
    }
}

/// Holds the first unrecovered error of a session
///
/// The handler is either quiescent or dead. Once dead, further errors are
/// ignored until the pending one is flushed or dumped.
#[derive(Debug, Default)]
pub struct ErrorHandler {
    pending: Option<Error>,
}

impl ErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the handler with an error
    pub fn die(&mut self, error: Error) {
        if self.pending.is_some() {
            debug!("dropping secondary error: {}", error);
            return;
        }
        debug!("error handler armed: {}", error);
        self.pending = Some(error);
    }

    /// Arm the handler with a lexical error at the given position
    pub fn die_lex(&mut self, position: SourcePosition, message: impl Into<String>) {
        self.die(Error::lexical(position, message));
    }

    pub fn is_dead(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&Error> {
        self.pending.as_ref()
    }

    /// Disarm the handler, returning the pending message
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|error| error.message)
    }

    /// Print the pending error to stderr and disarm the handler
    pub fn dump(&mut self, source: Option<&str>) {
        if let Some(error) = self.pending.take() {
            eprint!("{}", format_error(&error, source));
        }
    }
}

/// Format an error with a source excerpt when the position is known
pub fn format_error(error: &Error, source: Option<&str>) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} {}\n",
        format!("{} error:", error.kind).red().bold(),
        error.message
    ));

    let Some(position) = &error.position else {
        return output;
    };

    let file = position.file.as_deref().unwrap_or("input");
    output.push_str(&format!(
        "  {} {}:{}\n",
        "-->".blue().bold(),
        file.dimmed(),
        format!("{}:{}", position.line, position.column).cyan()
    ));

    let Some(source) = source else {
        return output;
    };

    let lines: Vec<&str> = source.lines().collect();
    let line = position.line;
    if line == 0 || line > lines.len() {
        return output;
    }
    let line_idx = line - 1;

    output.push_str(&format!("   {}\n", "|".blue()));

    if line_idx > 0 {
        output.push_str(&format!(
            " {} | {}\n",
            format!("{:3}", line - 1).blue().dimmed(),
            lines[line_idx - 1].dimmed()
        ));
    }

    output.push_str(&format!(
        " {} | {}\n",
        format!("{:3}", line).blue().bold(),
        lines[line_idx]
    ));

    let indicator = format!("{}^", " ".repeat(position.column.saturating_sub(1) + 7));
    output.push_str(&format!("   {} {}\n", "|".blue(), indicator.red().bold()));

    output.push_str(&format!("   {}\n", "|".blue()));
    output
}
