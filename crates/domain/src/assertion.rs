//! Response assertions.
//!
//! Declarative predicates evaluated against a normalized response.
//! Each kind is pure data; the application-layer engine interprets it.

use serde::{Deserialize, Serialize};

/// A declarative assertion to run against a response body or headers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Check the response status code equals a value.
    StatusEquals {
        /// Expected status code.
        expected: u16,
    },
    /// Check a header exists and its value contains a substring.
    HeaderContains {
        /// Header name (case-insensitive lookup).
        name: String,
        /// Substring the header value must contain.
        substring: String,
    },
    /// Check the body parses as a JSON array.
    BodyIsArray,
    /// Check a property exists with the given JSON type.
    ///
    /// On an object body the property must exist with the tagged type.
    /// On an array body every element must satisfy it; the failure
    /// message names the first offending element index.
    BodyHasProperty {
        /// Property name.
        name: String,
        /// Required JSON type of the property value.
        type_tag: TypeTag,
    },
    /// Check some array element has a property equal to a value.
    ///
    /// Set membership, never positional: the element may appear anywhere.
    ArrayContains {
        /// Property to compare on each element.
        property: String,
        /// Value the property must equal in at least one element.
        value: serde_json::Value,
    },
    /// Check a top-level property equals a JSON value.
    PropertyEquals {
        /// Property name.
        name: String,
        /// Expected value.
        value: serde_json::Value,
    },
}

impl Assertion {
    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusEquals { expected } => format!("Status equals {expected}"),
            Self::HeaderContains { name, substring } => {
                format!("Header '{name}' contains '{substring}'")
            }
            Self::BodyIsArray => "Body is a JSON array".to_string(),
            Self::BodyHasProperty { name, type_tag } => {
                format!("Property '{name}' is a {}", type_tag.as_str())
            }
            Self::ArrayContains { property, value } => {
                format!("Some element has {property} == {value}")
            }
            Self::PropertyEquals { name, value } => format!("Property '{name}' equals {value}"),
        }
    }
}

/// Tag for the six JSON value types.
///
/// Assertions pattern-match response bodies on this tag instead of
/// assuming any fixed shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    /// JSON null.
    Null,
    /// JSON boolean.
    Bool,
    /// JSON number.
    Number,
    /// JSON string.
    String,
    /// JSON array.
    Array,
    /// JSON object.
    Object,
}

impl TypeTag {
    /// Returns the tag name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Returns the tag of a JSON value.
    #[must_use]
    pub const fn of(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(_) => Self::Bool,
            serde_json::Value::Number(_) => Self::Number,
            serde_json::Value::String(_) => Self::String,
            serde_json::Value::Array(_) => Self::Array,
            serde_json::Value::Object(_) => Self::Object,
        }
    }

    /// Checks whether a JSON value has this type.
    #[must_use]
    pub const fn matches(self, value: &serde_json::Value) -> bool {
        matches!(
            (self, value),
            (Self::Null, serde_json::Value::Null)
                | (Self::Bool, serde_json::Value::Bool(_))
                | (Self::Number, serde_json::Value::Number(_))
                | (Self::String, serde_json::Value::String(_))
                | (Self::Array, serde_json::Value::Array(_))
                | (Self::Object, serde_json::Value::Object(_))
        )
    }
}

/// Expected status code value, set, or range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Range of status codes (e.g., 200-299).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
    /// One of multiple status codes.
    OneOf(Vec<u16>),
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => status >= *min && status <= *max,
            Self::OneOf(codes) => codes.contains(&status),
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => format!("= {code}"),
            Self::Range { min, max } => format!("in {min}-{max}"),
            Self::OneOf(codes) => {
                let codes_str: Vec<_> = codes.iter().map(ToString::to_string).collect();
                format!("in [{}]", codes_str.join(", "))
            }
        }
    }

    /// Create a "success" expectation (200-299).
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }

    /// Create an exact status expectation.
    #[must_use]
    pub const fn exact(code: u16) -> Self {
        Self::Exact(code)
    }
}

impl Default for StatusExpectation {
    fn default() -> Self {
        Self::success()
    }
}

/// How a step treats a status mismatch.
///
/// Tolerance is always explicit per step; there is no inherited or
/// silent tolerance anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExpectMode {
    /// A status mismatch fails the step.
    #[default]
    Strict,
    /// A status mismatch is recorded as an observation; the step's
    /// remaining assertions are skipped and the step passes.
    Tolerant,
}

/// Result of running a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionResult {
    /// The assertion that was run.
    pub assertion: Assertion,
    /// Whether the assertion passed.
    pub passed: bool,
    /// Actual value found (for display).
    pub actual: Option<String>,
    /// Failure message with expected vs. actual, if failed.
    pub message: Option<String>,
}

impl AssertionResult {
    /// Create a passed result.
    #[must_use]
    pub const fn pass(assertion: Assertion) -> Self {
        Self {
            assertion,
            passed: true,
            actual: None,
            message: None,
        }
    }

    /// Create a passed result with actual value.
    #[must_use]
    pub fn pass_with_value(assertion: Assertion, actual: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: true,
            actual: Some(actual.into()),
            message: None,
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(assertion: Assertion, message: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: false,
            actual: None,
            message: Some(message.into()),
        }
    }

    /// Create a failed result with actual value.
    #[must_use]
    pub fn fail_with_value(
        assertion: Assertion,
        actual: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            assertion,
            passed: false,
            actual: Some(actual.into()),
            message: Some(message.into()),
        }
    }
}
