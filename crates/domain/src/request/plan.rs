//! Fully resolved request plan

use serde::{Deserialize, Serialize};

use super::method::HttpMethod;

/// A fully resolved HTTP request, ready for the transport adapter.
///
/// All templates have already been resolved by the runner; the executor
/// only transports. Exactly one network call is made per plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestPlan {
    /// HTTP method to use.
    pub method: HttpMethod,
    /// Absolute URL (base URL joined with the resolved step path).
    pub url: String,
    /// Resolved query pairs, in order. Repeated keys are allowed.
    #[serde(default)]
    pub query: Vec<(String, String)>,
    /// Resolved request headers.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    /// Optional JSON request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl RequestPlan {
    /// Creates a plan with no query, headers, or body.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Sets the JSON body (builder pattern).
    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Appends a query pair (builder pattern).
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}
