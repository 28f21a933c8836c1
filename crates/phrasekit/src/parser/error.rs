//! Parse error types for phrase compilation.

use thiserror::Error;

/// An error that occurred while compiling a phrase.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The `{...}` settings clause of a placeholder is not a valid JSON object.
    #[error("malformed formatter settings at {line}:{column} in \"{phrase}\": {message}")]
    Settings {
        phrase: String,
        line: usize,
        column: usize,
        message: String,
    },

    /// A settings clause parsed but the placeholder was never closed with `}}`.
    #[error("expected `}}}}` after formatter settings at {line}:{column} in \"{phrase}\"")]
    Unclosed {
        phrase: String,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    /// 1-based line and column of the error within the phrase.
    pub fn position(&self) -> (usize, usize) {
        match self {
            ParseError::Settings { line, column, .. } | ParseError::Unclosed { line, column, .. } => {
                (*line, *column)
            }
        }
    }

    /// The raw phrase text that failed to compile.
    pub fn phrase(&self) -> &str {
        match self {
            ParseError::Settings { phrase, .. } | ParseError::Unclosed { phrase, .. } => phrase,
        }
    }
}
