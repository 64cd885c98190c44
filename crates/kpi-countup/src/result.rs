//! Result and error types for kpi-countup.

use thiserror::Error;

/// Result type for countup operations
pub type CountupResult<T> = Result<T, CountupError>;

/// Errors that can occur while preparing or running a count-up
///
/// None of these escape [`crate::Animator::animate`]; they are folded into an
/// [`crate::AnimateOutcome`] there and only surface through the lower-level APIs.
#[derive(Debug, Error)]
pub enum CountupError {
    /// Source attribute absent or empty
    #[error("Source attribute `{attribute}` is missing or empty")]
    MissingSource {
        /// Attribute that was read
        attribute: String,
    },

    /// Source string has no numeric prefix after normalization
    #[error("Source value is not numeric: {source_text:?}")]
    NotNumeric {
        /// Raw source string
        source_text: String,
    },

    /// Configuration rejected by validation
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },

    /// Logging subscriber could not be installed
    #[error("Logging setup failed: {message}")]
    Logging {
        /// Error message
        message: String,
    },

    /// Browser API call failed
    #[error("Browser error: {message}")]
    Browser {
        /// Error message
        message: String,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CountupError {
    /// Build an [`CountupError::InvalidConfig`] from any message
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_source_display() {
        let err = CountupError::MissingSource {
            attribute: "data-value".into(),
        };
        assert_eq!(
            err.to_string(),
            "Source attribute `data-value` is missing or empty"
        );
    }

    #[test]
    fn test_not_numeric_display_quotes_source() {
        let err = CountupError::NotNumeric {
            source_text: "N/A".into(),
        };
        assert_eq!(err.to_string(), "Source value is not numeric: \"N/A\"");
    }

    #[test]
    fn test_invalid_config_helper() {
        let err = CountupError::invalid_config("duration_ms must be positive");
        assert!(matches!(err, CountupError::InvalidConfig { .. }));
        assert!(err.to_string().contains("duration_ms"));
    }

    #[test]
    fn test_json_error_from() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CountupError = json_err.into();
        assert!(matches!(err, CountupError::Json(_)));
    }
}
