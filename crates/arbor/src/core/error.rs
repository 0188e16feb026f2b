use std::result::Result as StdResult;

use thiserror::Error;

use crate::core::dump::Trajectory;

/// Result type for arbor operations.
pub type Result<T> = StdResult<T, Error>;

/// Parse error marker type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
#[error("{message}")]
pub struct ParseError {
    /// Parse error message, optionally including location.
    message: String,
}

impl ParseError {
    /// Construct a parse error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Construct a parse error with optional line/offset information.
    pub fn with_position(
        message: impl Into<String>,
        line: Option<usize>,
        offset: Option<usize>,
    ) -> Self {
        let message = message.into();
        let message = match (line, offset) {
            (Some(line), Some(offset)) => format!("{message} (line {line}, offset {offset})"),
            (Some(line), None) => format!("{message} (line {line})"),
            (None, Some(offset)) => format!("{message} (offset {offset})"),
            (None, None) => message,
        };
        Self { message }
    }
}

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// The convergence loop hit its iteration cap without halting. This is a
    /// programming error in a widget whose transition never settles.
    #[error("convergence: no stable state after {frames} frames\n{trajectory}")]
    NotConverged {
        /// Number of frames processed before giving up.
        frames: usize,
        /// The most recent snapshots, oldest first.
        trajectory: Trajectory,
    },

    #[error("invalid: {0}")]
    /// Invalid input error.
    Invalid(String),

    #[error("not found: {0}")]
    /// A path did not resolve to a node in the published tree.
    NotFound(String),

    #[error("parse error: {0}")]
    /// Parsing failure.
    Parse(#[source] ParseError),
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}
