//! Assertion engine.
//!
//! Evaluates declarative assertions against a normalized response.
//! Every check is a pure function of the response; the engine never
//! touches the network.

use attest_domain::{Assertion, AssertionResult, Response, TypeTag};

/// How assertion failures within a step are accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvaluationMode {
    /// Evaluate every assertion for maximal diagnostic output.
    #[default]
    CollectAll,
    /// Stop at the first failure within the step. Never aborts the
    /// scenario by itself.
    FailFast,
}

/// Evaluates assertions against responses.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssertionEngine {
    mode: EvaluationMode,
}

impl AssertionEngine {
    /// Creates an engine with the default collect-all mode.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: EvaluationMode::CollectAll,
        }
    }

    /// Creates an engine with an explicit evaluation mode.
    #[must_use]
    pub const fn with_mode(mode: EvaluationMode) -> Self {
        Self { mode }
    }

    /// Returns the configured evaluation mode.
    #[must_use]
    pub const fn mode(&self) -> EvaluationMode {
        self.mode
    }

    /// Runs a list of assertions against a response.
    #[must_use]
    pub fn evaluate(&self, assertions: &[Assertion], response: &Response) -> Vec<AssertionResult> {
        let mut results = Vec::with_capacity(assertions.len());

        for assertion in assertions {
            let result = Self::check(assertion, response);
            let failed = !result.passed;
            results.push(result);

            if failed && self.mode == EvaluationMode::FailFast {
                break;
            }
        }

        results
    }

    /// Runs a single assertion against a response.
    #[must_use]
    pub fn check(assertion: &Assertion, response: &Response) -> AssertionResult {
        match assertion {
            Assertion::StatusEquals { expected } => {
                Self::check_status_equals(assertion, response, *expected)
            }
            Assertion::HeaderContains { name, substring } => {
                Self::check_header_contains(assertion, response, name, substring)
            }
            Assertion::BodyIsArray => Self::check_body_is_array(assertion, response),
            Assertion::BodyHasProperty { name, type_tag } => {
                Self::check_body_has_property(assertion, response, name, *type_tag)
            }
            Assertion::ArrayContains { property, value } => {
                Self::check_array_contains(assertion, response, property, value)
            }
            Assertion::PropertyEquals { name, value } => {
                Self::check_property_equals(assertion, response, name, value)
            }
        }
    }

    fn check_status_equals(
        assertion: &Assertion,
        response: &Response,
        expected: u16,
    ) -> AssertionResult {
        let actual = response.status;
        if actual == expected {
            AssertionResult::pass_with_value(assertion.clone(), actual.to_string())
        } else {
            AssertionResult::fail_with_value(
                assertion.clone(),
                actual.to_string(),
                format!("expected status {expected}, got {actual}"),
            )
        }
    }

    fn check_header_contains(
        assertion: &Assertion,
        response: &Response,
        name: &str,
        substring: &str,
    ) -> AssertionResult {
        match response.get_header(name) {
            Some(actual) if actual.contains(substring) => {
                AssertionResult::pass_with_value(assertion.clone(), actual.clone())
            }
            Some(actual) => AssertionResult::fail_with_value(
                assertion.clone(),
                actual.clone(),
                format!("header '{name}' value '{actual}' does not contain '{substring}'"),
            ),
            None => {
                AssertionResult::fail(assertion.clone(), format!("header '{name}' not present"))
            }
        }
    }

    fn check_body_is_array(assertion: &Assertion, response: &Response) -> AssertionResult {
        match response.body_json() {
            Some(serde_json::Value::Array(items)) => {
                AssertionResult::pass_with_value(assertion.clone(), format!("{} elements", items.len()))
            }
            Some(other) => AssertionResult::fail_with_value(
                assertion.clone(),
                TypeTag::of(&other).as_str(),
                format!("expected a JSON array, got {}", TypeTag::of(&other).as_str()),
            ),
            None => AssertionResult::fail_with_value(
                assertion.clone(),
                response.body_preview(),
                "body is not valid JSON",
            ),
        }
    }

    fn check_body_has_property(
        assertion: &Assertion,
        response: &Response,
        name: &str,
        type_tag: TypeTag,
    ) -> AssertionResult {
        let Some(body) = response.body_json() else {
            return AssertionResult::fail_with_value(
                assertion.clone(),
                response.body_preview(),
                "body is not valid JSON",
            );
        };

        match body {
            serde_json::Value::Object(_) => {
                match Self::property_failure(&body, name, type_tag) {
                    None => AssertionResult::pass(assertion.clone()),
                    Some(message) => AssertionResult::fail(assertion.clone(), message),
                }
            }
            serde_json::Value::Array(items) => {
                // Every element must satisfy the check; name the first
                // offending element index.
                for (index, element) in items.iter().enumerate() {
                    if let Some(message) = Self::property_failure(element, name, type_tag) {
                        return AssertionResult::fail(
                            assertion.clone(),
                            format!("element {index}: {message}"),
                        );
                    }
                }
                AssertionResult::pass_with_value(assertion.clone(), format!("{} elements", items.len()))
            }
            other => AssertionResult::fail_with_value(
                assertion.clone(),
                TypeTag::of(&other).as_str(),
                format!(
                    "expected an object or array body, got {}",
                    TypeTag::of(&other).as_str()
                ),
            ),
        }
    }

    /// Returns a failure message when `value` lacks `name` with the
    /// required type, `None` when the check holds.
    fn property_failure(value: &serde_json::Value, name: &str, type_tag: TypeTag) -> Option<String> {
        match value {
            serde_json::Value::Object(map) => match map.get(name) {
                Some(property) if type_tag.matches(property) => None,
                Some(property) => Some(format!(
                    "property '{name}' is a {}, expected {}",
                    TypeTag::of(property).as_str(),
                    type_tag.as_str()
                )),
                None => Some(format!("property '{name}' not present")),
            },
            other => Some(format!(
                "expected an object, got {}",
                TypeTag::of(other).as_str()
            )),
        }
    }

    fn check_array_contains(
        assertion: &Assertion,
        response: &Response,
        property: &str,
        value: &serde_json::Value,
    ) -> AssertionResult {
        match response.body_json() {
            Some(serde_json::Value::Array(items)) => {
                // Set membership, not positional equality.
                let found = items
                    .iter()
                    .any(|element| element.get(property) == Some(value));
                if found {
                    AssertionResult::pass(assertion.clone())
                } else {
                    AssertionResult::fail_with_value(
                        assertion.clone(),
                        format!("{} elements", items.len()),
                        format!("no element with {property} == {value}"),
                    )
                }
            }
            Some(other) => AssertionResult::fail_with_value(
                assertion.clone(),
                TypeTag::of(&other).as_str(),
                format!("expected a JSON array, got {}", TypeTag::of(&other).as_str()),
            ),
            None => AssertionResult::fail_with_value(
                assertion.clone(),
                response.body_preview(),
                "body is not valid JSON",
            ),
        }
    }

    fn check_property_equals(
        assertion: &Assertion,
        response: &Response,
        name: &str,
        expected: &serde_json::Value,
    ) -> AssertionResult {
        let Some(body) = response.body_json() else {
            return AssertionResult::fail_with_value(
                assertion.clone(),
                response.body_preview(),
                "body is not valid JSON",
            );
        };

        match body.get(name) {
            Some(actual) if actual == expected => {
                AssertionResult::pass_with_value(assertion.clone(), actual.to_string())
            }
            Some(actual) => AssertionResult::fail_with_value(
                assertion.clone(),
                actual.to_string(),
                format!("property '{name}': expected {expected}, got {actual}"),
            ),
            None => {
                AssertionResult::fail(assertion.clone(), format!("property '{name}' not present"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn json_response(status: u16, body: &str) -> Response {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Response::new(status, headers, body, Duration::from_millis(50))
    }

    #[test]
    fn test_status_equals() {
        let response = json_response(201, "{}");

        let result = AssertionEngine::check(&Assertion::StatusEquals { expected: 201 }, &response);
        assert!(result.passed);

        let result = AssertionEngine::check(&Assertion::StatusEquals { expected: 200 }, &response);
        assert!(!result.passed);
        assert_eq!(result.actual.as_deref(), Some("201"));
    }

    #[test]
    fn test_header_contains() {
        let response = json_response(200, "{}");

        let assertion = Assertion::HeaderContains {
            name: "content-type".to_string(),
            substring: "application/json".to_string(),
        };
        assert!(AssertionEngine::check(&assertion, &response).passed);

        let assertion = Assertion::HeaderContains {
            name: "content-type".to_string(),
            substring: "text/html".to_string(),
        };
        assert!(!AssertionEngine::check(&assertion, &response).passed);

        let assertion = Assertion::HeaderContains {
            name: "x-missing".to_string(),
            substring: "anything".to_string(),
        };
        assert!(!AssertionEngine::check(&assertion, &response).passed);
    }

    #[test]
    fn test_body_is_array() {
        let response = json_response(200, r#"[{"id": 1}]"#);
        assert!(AssertionEngine::check(&Assertion::BodyIsArray, &response).passed);

        let response = json_response(200, r#"{"id": 1}"#);
        assert!(!AssertionEngine::check(&Assertion::BodyIsArray, &response).passed);

        let response = json_response(200, "not json");
        assert!(!AssertionEngine::check(&Assertion::BodyIsArray, &response).passed);
    }

    #[test]
    fn test_body_has_property_on_object() {
        let response = json_response(200, r#"{"title": "New Post"}"#);
        let assertion = Assertion::BodyHasProperty {
            name: "title".to_string(),
            type_tag: TypeTag::String,
        };
        assert!(AssertionEngine::check(&assertion, &response).passed);

        let assertion = Assertion::BodyHasProperty {
            name: "title".to_string(),
            type_tag: TypeTag::Number,
        };
        assert!(!AssertionEngine::check(&assertion, &response).passed);
    }

    #[test]
    fn test_body_has_property_names_first_offending_element() {
        let response = json_response(
            200,
            r#"[{"title": "a"}, {"title": "b"}, {"title": 3}, {"title": 4}]"#,
        );
        let assertion = Assertion::BodyHasProperty {
            name: "title".to_string(),
            type_tag: TypeTag::String,
        };

        let result = AssertionEngine::check(&assertion, &response);
        assert!(!result.passed);
        let message = result.message.unwrap_or_default();
        assert!(message.starts_with("element 2:"), "message was: {message}");
    }

    #[test]
    fn test_body_has_property_passes_for_all_elements() {
        let response = json_response(200, r#"[{"title": "a"}, {"title": "b"}]"#);
        let assertion = Assertion::BodyHasProperty {
            name: "title".to_string(),
            type_tag: TypeTag::String,
        };
        assert!(AssertionEngine::check(&assertion, &response).passed);
    }

    #[test]
    fn test_array_contains_is_set_membership() {
        let response = json_response(200, r#"[{"id": 60}, {"id": 55}]"#);

        // Order does not matter.
        let assertion = Assertion::ArrayContains {
            property: "id".to_string(),
            value: serde_json::json!(55),
        };
        assert!(AssertionEngine::check(&assertion, &response).passed);

        let assertion = Assertion::ArrayContains {
            property: "id".to_string(),
            value: serde_json::json!(99),
        };
        assert!(!AssertionEngine::check(&assertion, &response).passed);
    }

    #[test]
    fn test_property_equals() {
        let response = json_response(201, r#"{"title": "New Post", "userId": 1}"#);

        let assertion = Assertion::PropertyEquals {
            name: "title".to_string(),
            value: serde_json::json!("New Post"),
        };
        assert!(AssertionEngine::check(&assertion, &response).passed);

        let assertion = Assertion::PropertyEquals {
            name: "userId".to_string(),
            value: serde_json::json!(2),
        };
        let result = AssertionEngine::check(&assertion, &response);
        assert!(!result.passed);
        assert_eq!(result.actual.as_deref(), Some("1"));
    }

    #[test]
    fn test_collect_all_evaluates_everything() {
        let engine = AssertionEngine::new();
        let response = json_response(500, "not json");

        let assertions = vec![
            Assertion::StatusEquals { expected: 200 },
            Assertion::BodyIsArray,
        ];
        let results = engine.evaluate(&assertions, &response);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| !r.passed));
    }

    #[test]
    fn test_fail_fast_stops_at_first_failure() {
        let engine = AssertionEngine::with_mode(EvaluationMode::FailFast);
        let response = json_response(500, "not json");

        let assertions = vec![
            Assertion::StatusEquals { expected: 200 },
            Assertion::BodyIsArray,
        ];
        let results = engine.evaluate(&assertions, &response);
        assert_eq!(results.len(), 1);
    }
}
