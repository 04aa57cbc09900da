//! Request header types

use serde::{Deserialize, Serialize};

/// A request header name-value pair.
///
/// Values may contain `{{key}}` placeholders resolved before sending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderParam {
    /// Header name
    pub name: String,
    /// Header value (possibly templated)
    pub value: String,
}

impl HeaderParam {
    /// Creates a new header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
