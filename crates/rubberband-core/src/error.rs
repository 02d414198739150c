//! Error types for Rubberband.
//!
//! Errors only exist at the configuration boundary. Input handling never
//! fails; rejected or malformed input is ignored and logged instead.

/// The main error type for Rubberband operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Signal-related error.
    #[error("Signal error: {0}")]
    Signal(#[from] SignalError),
    /// Configuration-related error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Signal-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignalError {
    /// The connection ID is invalid or has already been disconnected.
    #[error("Invalid or disconnected connection ID")]
    InvalidConnection,
    /// The signal has been dropped and is no longer available.
    #[error("Signal has been dropped")]
    SignalDropped,
}

/// Configuration errors raised by the strict constructors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Zoom must be a finite number greater than zero.
    #[error("Invalid zoom factor {0}: must be finite and greater than zero")]
    InvalidZoom(f32),
    /// An ignore-target selector could not be parsed.
    #[error("Invalid ignore selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
    /// A configuration document could not be deserialized.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

impl ConfigError {
    /// Create a selector error.
    pub fn invalid_selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
        }
    }
}

/// A specialized Result type for Rubberband operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts_into_error() {
        let err: Error = ConfigError::InvalidZoom(0.0).into();
        assert!(matches!(err, Error::Config(ConfigError::InvalidZoom(_))));
        assert!(err.to_string().contains("Invalid zoom factor 0"));
    }

    #[test]
    fn test_selector_error_message() {
        let err = ConfigError::invalid_selector(".a >", "Dangling combinator");
        assert_eq!(
            err.to_string(),
            "Invalid ignore selector '.a >': Dangling combinator"
        );
    }
}
