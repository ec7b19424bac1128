//! Error types.

use thiserror::Error;

/// What went wrong while parsing path data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The path data has something other than a command as its first token.
    #[error("path should start with command")]
    MissingCommand,

    /// A command letter is not followed by enough arguments.
    #[error("{count} numbers should follow command '{command}'")]
    MissingNumbers { count: usize, command: char },

    /// A character that is not a known command appears where a command was expected.
    #[error("unknown command '{0}'")]
    UnknownCommand(char),
}

/// An error from parsing path data.
///
/// Parsing is all-or-nothing: when this is returned, no partial path is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("bad path: {}", describe(.kind, .position))]
pub struct ParseError {
    /// 1-based character offset of the offending token.
    pub position: usize,
    pub kind: ErrorKind,
}

impl ParseError {
    pub fn new(position: usize, kind: ErrorKind) -> ParseError {
        ParseError { position, kind }
    }
}

fn describe(kind: &ErrorKind, position: &usize) -> String {
    match kind {
        ErrorKind::MissingCommand => kind.to_string(),
        _ => format!("{} at position {}", kind, position),
    }
}
