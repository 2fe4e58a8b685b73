//! Error types for reading the seria text format.

use thiserror::Error;

/// Structured error types for parsing.
///
/// Parsing is strict about structure and permissive about scalar content, so the
/// only failure is a document whose block structure cannot be interpreted.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The text is not a well-formed seria document
    #[error("malformed document at line {line}, column {column}: {reason}")]
    Malformed {
        line: usize,
        column: usize,
        reason: String,
    },
}

impl FormatError {
    /// Check if this error reports a malformed document
    pub fn is_malformed(&self) -> bool {
        matches!(self, FormatError::Malformed { .. })
    }

    /// The 1-based line the problem was found on
    pub fn line(&self) -> usize {
        match self {
            FormatError::Malformed { line, .. } => *line,
        }
    }
}

// Conversion from FormatError to the main Error type
impl From<FormatError> for crate::Error {
    fn from(err: FormatError) -> Self {
        crate::Error::Format(err)
    }
}
