//! Error types for the formatter system

use super::value::Kind;
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, FormatterError>;

/// Out-of-band channel receiving errors that must not abort a record
pub type ErrorHandler = Arc<dyn Fn(&FormatterError) + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum FormatterError {
    /// A value was accessed as a kind it does not hold
    #[error("Invalid kind: expected {expected}, found {actual}")]
    InvalidKind { expected: Kind, actual: Kind },

    /// Lazy value resolution did not settle within the configured ceiling
    #[error("Lazy value resolution exceeded {max_depth} steps")]
    RecursionLimit { max_depth: usize },

    /// A rule returned an error or panicked
    #[error("Formatter rule '{rule}' failed: {message}")]
    RuleFailed { rule: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl FormatterError {
    /// Create an invalid kind error
    pub fn invalid_kind(expected: Kind, actual: Kind) -> Self {
        FormatterError::InvalidKind { expected, actual }
    }

    /// Create a recursion limit error
    pub fn recursion_limit(max_depth: usize) -> Self {
        FormatterError::RecursionLimit { max_depth }
    }

    /// Create a rule failure error
    pub fn rule_failed(rule: impl Into<String>, message: impl Into<String>) -> Self {
        FormatterError::RuleFailed {
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        FormatterError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        FormatterError::Other(msg.into())
    }
}

/// Default error channel: a tagged diagnostic line on stderr
pub fn stderr_error_handler() -> ErrorHandler {
    Arc::new(|err: &FormatterError| {
        eprintln!("[FORMATTER ERROR] {}", err);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = FormatterError::invalid_kind(Kind::Group, Kind::String);
        assert!(matches!(err, FormatterError::InvalidKind { .. }));

        let err = FormatterError::recursion_limit(100);
        assert!(matches!(err, FormatterError::RecursionLimit { max_depth: 100 }));

        let err = FormatterError::config("EngineConfig", "max_resolve_depth must be positive");
        assert!(matches!(err, FormatterError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = FormatterError::invalid_kind(Kind::Group, Kind::Int64);
        assert_eq!(err.to_string(), "Invalid kind: expected Group, found Int64");

        let err = FormatterError::recursion_limit(3);
        assert_eq!(err.to_string(), "Lazy value resolution exceeded 3 steps");

        let err = FormatterError::rule_failed("format_by_key(email)", "boom");
        assert_eq!(
            err.to_string(),
            "Formatter rule 'format_by_key(email)' failed: boom"
        );
    }
}
