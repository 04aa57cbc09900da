//! Scenario source port

use async_trait::async_trait;
use thiserror::Error;

use attest_domain::Scenario;

/// Errors loading scenario definitions.
///
/// All of these are configuration errors: they surface before any
/// scenario runs and abort the whole process.
#[derive(Debug, Error)]
pub enum ScenarioSourceError {
    /// The source location does not exist.
    #[error("scenario source not found: {0}")]
    NotFound(String),

    /// An I/O failure while reading definitions.
    #[error("failed to read scenarios: {0}")]
    Io(String),

    /// A definition could not be parsed or validated.
    #[error("invalid scenario definition in {file}: {message}")]
    Invalid {
        /// File the bad definition came from.
        file: String,
        /// Parse or validation error.
        message: String,
    },
}

/// Port for loading scenario definitions.
///
/// Lets the composition root mix embedded suites with file-based
/// catalogs behind one interface.
#[async_trait]
pub trait ScenarioSource: Send + Sync {
    /// Loads all scenarios from this source.
    ///
    /// # Errors
    ///
    /// Returns `ScenarioSourceError` when definitions are unreadable or
    /// invalid.
    async fn load(&self) -> Result<Vec<Scenario>, ScenarioSourceError>;
}
