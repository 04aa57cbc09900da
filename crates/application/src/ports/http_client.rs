//! HTTP client port

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use attest_domain::{RequestPlan, Response};

/// Transport-level failure taxonomy.
///
/// These are fatal to the affected step and never retried: contract
/// tests must observe the server's actual first-attempt behavior.
/// A non-2xx status is NOT an error; it comes back as a [`Response`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HttpClientError {
    /// The connection was refused.
    #[error("connection refused: {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The request timed out.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },

    /// Name resolution failed.
    #[error("DNS resolution failed for {host}: {message}")]
    Dns {
        /// Host that failed to resolve.
        host: String,
        /// Underlying error message.
        message: String,
    },

    /// The request URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Any other transport failure.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Port for executing HTTP requests.
///
/// Dyn-compatible (boxed future) so the runner can hold an
/// `Arc<dyn HttpClient>` and tests can substitute a mock.
/// Implementations make exactly one network call per invocation.
pub trait HttpClient: Send + Sync {
    /// Executes a resolved request plan and returns the normalized
    /// response.
    ///
    /// # Errors
    ///
    /// Returns `HttpClientError` only on transport failure; non-2xx
    /// statuses are returned as successful `Response` values.
    fn execute(
        &self,
        plan: &RequestPlan,
    ) -> Pin<Box<dyn Future<Output = Result<Response, HttpClientError>> + Send + '_>>;
}
