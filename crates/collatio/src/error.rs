//! Error types for the Collatio library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Collatio operations.
#[derive(Debug, Error)]
pub enum CollatioError {
    /// Malformed collation report; no review queue can be built from it.
    #[error("Unable to build review queue: {context}: {message}")]
    DataFormat { context: String, message: String },

    /// The collation service reported that a verse could not be collated.
    #[error("Collation failed for verse {verse}: {message}")]
    CollationFailed { verse: String, message: String },

    /// A local invariant would be violated; nothing was sent or changed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A store or network call failed. The caller may retry.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from the CSV writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl CollatioError {
    /// Build a data-format error.
    pub fn data_format(context: impl Into<String>, message: impl Into<String>) -> Self {
        CollatioError::DataFormat {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Whether re-issuing the same operation may succeed.
    ///
    /// Only persistence failures are retryable; everything else fails the
    /// same way on every attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CollatioError::Persistence(_))
    }
}

/// Result type alias for Collatio operations.
pub type Result<T> = std::result::Result<T, CollatioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_persistence_is_retryable() {
        assert!(CollatioError::Persistence("timeout".into()).is_retryable());
        assert!(!CollatioError::Validation("dup".into()).is_retryable());
        assert!(!CollatioError::data_format("verse 1", "not a list").is_retryable());
    }

    #[test]
    fn test_data_format_message() {
        let err = CollatioError::data_format("verse '3'", "expected a list of entries");
        assert_eq!(
            err.to_string(),
            "Unable to build review queue: verse '3': expected a list of entries"
        );
    }
}
