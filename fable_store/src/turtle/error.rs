//! Error types for Turtle reading.

use thiserror::Error;

/// Error type for Turtle parsing operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurtleError {
    /// Invalid token.
    #[error("Lexer error at position {position}: {message}")]
    Lexer { position: usize, message: String },

    /// Unexpected token or unsupported structure.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Relative IRI with no base declared.
    #[error("IRI resolution error: {0}")]
    IriResolution(String),

    #[error("Undefined prefix: {0}")]
    UndefinedPrefix(String),

    #[error("Invalid escape sequence: {0}")]
    InvalidEscape(String),
}

/// Result type for Turtle operations.
pub type Result<T> = std::result::Result<T, TurtleError>;

impl TurtleError {
    /// Create a lexer error.
    pub fn lexer(position: usize, message: impl Into<String>) -> Self {
        Self::Lexer {
            position,
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Byte offset of the failure, when known.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Lexer { position, .. } | Self::Parse { position, .. } => Some(*position),
            _ => None,
        }
    }
}
