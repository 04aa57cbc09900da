//! Normalized HTTP response
//!
//! The executor reduces every HTTP exchange to this shape; assertions and
//! captures only ever see it. A non-2xx status is data here, not an error.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A normalized HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response headers as a map.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Response body as text. Bodies are arbitrary JSON (or not JSON at
    /// all); parse on demand via [`Response::body_json`].
    pub body: String,
    /// Round-trip time.
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

impl Response {
    /// Creates a new response from raw parts.
    #[must_use]
    pub fn new(
        status: u16,
        headers: HashMap<String, String>,
        body: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
            duration,
        }
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Attempts to parse the body as JSON.
    #[must_use]
    pub fn body_json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// Returns a short body preview for diagnostics.
    #[must_use]
    pub fn body_preview(&self) -> String {
        const MAX: usize = 120;
        if self.body.len() > MAX {
            let mut end = MAX;
            while !self.body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &self.body[..end])
        } else {
            self.body.clone()
        }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn json_response(status: u16, body: &str) -> Response {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Response::new(status, headers, body, Duration::from_millis(40))
    }

    #[test]
    fn test_is_success() {
        assert!(json_response(200, "{}").is_success());
        assert!(json_response(201, "{}").is_success());
        assert!(!json_response(404, "{}").is_success());
        assert!(!json_response(500, "{}").is_success());
    }

    #[test]
    fn test_get_header_case_insensitive() {
        let response = json_response(200, "{}");
        assert_eq!(
            response.get_header("content-type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(response.get_header("CONTENT-TYPE").is_some(), true);
        assert_eq!(response.get_header("x-missing"), None);
    }

    #[test]
    fn test_body_json() {
        let response = json_response(200, r#"{"id": 1}"#);
        let json = response.body_json();
        assert_eq!(json, Some(serde_json::json!({"id": 1})));

        let response = json_response(200, "not json");
        assert!(response.body_json().is_none());
    }

    #[test]
    fn test_body_preview_truncates() {
        let long = "x".repeat(300);
        let response = json_response(200, &long);
        assert!(response.body_preview().ends_with("..."));
        assert!(response.body_preview().len() < long.len());
    }
}
