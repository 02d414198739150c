//! Error types for selector parsing.

/// Result type alias for selector operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing selectors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Tokenizer-level parse error.
    #[error("Selector parse error at line {line}, column {column}: {message}")]
    Parse {
        message: String,
        line: u32,
        column: u32,
    },

    /// The selector is syntactically valid CSS but not supported, or malformed.
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

impl Error {
    /// Create a parse error.
    pub fn parse(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::Parse {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a selector error.
    pub fn invalid_selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
        }
    }
}
