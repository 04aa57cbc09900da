//! Application error types

use thiserror::Error;

use attest_domain::DomainError;

use crate::ports::ScenarioSourceError;

/// Application-level errors.
///
/// These surface before or around a run; per-step failures are folded
/// into the scenario's `RunResult` instead and never escape as errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// A scenario with the same name is already registered.
    #[error("duplicate scenario name: {0}")]
    DuplicateScenario(String),

    /// Loading scenario definitions failed.
    #[error("scenario source error: {0}")]
    Source(#[from] ScenarioSourceError),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
