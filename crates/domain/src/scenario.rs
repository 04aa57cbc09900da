//! Scenario and step model.
//!
//! A scenario is a named, ordered sequence of HTTP steps plus
//! expectations. Immutable once registered; a zero-step scenario is
//! valid and trivially passes.

use serde::{Deserialize, Serialize};

use crate::assertion::{Assertion, ExpectMode, StatusExpectation};
use crate::capture::CaptureRule;
use crate::request::{HeaderParam, HttpMethod, QueryParam, QueryParams};

/// A named contract-test scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name; the identity used in reports and filtering.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tags usable for filtering a run.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Ordered steps. Later steps may reference values captured by
    /// earlier ones.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Creates a new empty scenario.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            tags: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Adds a description (builder pattern).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a tag (builder pattern).
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Adds a step (builder pattern).
    #[must_use]
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Returns true if a tag is present.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the scenario has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// One HTTP request/response exchange within a scenario.
///
/// Path, query values, header values, and string leaves of the body may
/// contain `{{key}}` placeholders referencing earlier captures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Step name for reports.
    pub name: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Path template joined onto the base URL.
    pub path: String,
    /// Query parameters (templated values).
    #[serde(default, skip_serializing_if = "QueryParams::is_empty")]
    pub query: QueryParams,
    /// Request headers (templated values).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<HeaderParam>,
    /// Optional JSON body whose string leaves may be templated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    /// Expectations evaluated against the response.
    #[serde(default)]
    pub expect: StepExpectations,
    /// Values to extract from the response body.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub captures: Vec<CaptureRule>,
}

impl Step {
    /// Creates a new step.
    #[must_use]
    pub fn new(name: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            path: path.into(),
            query: QueryParams::new(),
            headers: Vec::new(),
            body: None,
            expect: StepExpectations::default(),
            captures: Vec::new(),
        }
    }

    /// Creates a GET step.
    #[must_use]
    pub fn get(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Get, path)
    }

    /// Creates a POST step.
    #[must_use]
    pub fn post(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Post, path)
    }

    /// Creates a PUT step.
    #[must_use]
    pub fn put(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Put, path)
    }

    /// Creates a DELETE step.
    #[must_use]
    pub fn delete(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Delete, path)
    }

    /// Sets the JSON body (builder pattern).
    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a query parameter (builder pattern).
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.add(QueryParam::new(key, value));
        self
    }

    /// Adds a request header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(HeaderParam::new(name, value));
        self
    }

    /// Sets the expectations (builder pattern).
    #[must_use]
    pub fn expecting(mut self, expect: StepExpectations) -> Self {
        self.expect = expect;
        self
    }

    /// Adds a capture rule (builder pattern).
    #[must_use]
    pub fn capture(mut self, key: impl Into<String>, pointer: impl Into<String>) -> Self {
        self.captures.push(CaptureRule::new(key, pointer));
        self
    }
}

/// Declarative expectations for one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StepExpectations {
    /// Optional status rule, evaluated before body assertions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusExpectation>,
    /// Strict or tolerant status handling.
    #[serde(default)]
    pub mode: ExpectMode,
    /// Body and header assertions, in order.
    #[serde(default)]
    pub assertions: Vec<Assertion>,
}

impl StepExpectations {
    /// Creates expectations with an exact status rule (strict).
    #[must_use]
    pub const fn status(code: u16) -> Self {
        Self {
            status: Some(StatusExpectation::exact(code)),
            mode: ExpectMode::Strict,
            assertions: Vec::new(),
        }
    }

    /// Switches to tolerant mode (builder pattern).
    ///
    /// A status mismatch is then observed and logged instead of failing
    /// the step.
    #[must_use]
    pub const fn tolerant(mut self) -> Self {
        self.mode = ExpectMode::Tolerant;
        self
    }

    /// Adds an assertion (builder pattern).
    #[must_use]
    pub fn assert(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }
}
