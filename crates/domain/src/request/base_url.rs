//! Base URL configuration value

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::error::{DomainError, DomainResult};

/// The single base URL all scenario paths are joined against.
///
/// Scenarios never embed hosts; the runner combines this value with each
/// step's resolved path to form the absolute request URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Parses and validates a base URL.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if the input is not an absolute
    /// `http` or `https` URL with a host.
    pub fn parse(input: &str) -> DomainResult<Self> {
        let url = Url::parse(input.trim())
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {input}")))?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(DomainError::InvalidUrl(format!(
                    "unsupported scheme '{other}': {input}"
                )));
            }
        }

        if url.host_str().is_none() {
            return Err(DomainError::InvalidUrl(format!("missing host: {input}")));
        }

        Ok(Self(url))
    }

    /// Joins a step path onto this base URL.
    ///
    /// Duplicate slashes at the seam are collapsed, so both `/posts`
    /// and `posts` produce the same absolute URL.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{path}")
        }
    }

    /// Returns the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
