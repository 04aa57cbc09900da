//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP method is not part of the contract surface.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A scenario was given an empty name.
    #[error("scenario name must not be empty")]
    EmptyScenarioName,

    /// A capture key was written twice within one scenario run.
    #[error("capture key already written: {0}")]
    DuplicateCaptureKey(String),

    /// A capture rule was given an invalid JSON Pointer.
    #[error("invalid capture pointer '{pointer}' for key '{key}'")]
    InvalidCapturePointer {
        /// The capture key the rule would write.
        key: String,
        /// The offending pointer expression.
        pointer: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
