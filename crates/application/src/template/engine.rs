//! Template resolution against the capture map
//!
//! Substitutes `{{key}}` placeholders in paths, query values, headers,
//! and JSON body trees. Unresolved keys are surfaced so the runner can
//! report a missing dependency instead of sending a broken request.

use attest_domain::CaptureMap;

use super::parser::{has_placeholders, parse_placeholders};

/// Result of resolving one templated string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// The resolved string with all placeholders substituted.
    pub resolved: String,

    /// Capture keys that could not be resolved.
    pub unresolved: Vec<String>,
}

impl Rendered {
    /// Creates a result for input with no placeholders.
    #[must_use]
    pub fn literal(input: &str) -> Self {
        Self {
            resolved: input.to_string(),
            unresolved: Vec::new(),
        }
    }

    /// Returns true when every placeholder was resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Resolves templates against a scenario's capture map.
#[derive(Debug, Clone, Copy)]
pub struct TemplateEngine<'a> {
    captures: &'a CaptureMap,
}

impl<'a> TemplateEngine<'a> {
    /// Creates an engine reading from the given capture map.
    #[must_use]
    pub const fn new(captures: &'a CaptureMap) -> Self {
        Self { captures }
    }

    /// Resolves all placeholders in the input string.
    ///
    /// Unresolved placeholders are left verbatim and reported in
    /// [`Rendered::unresolved`].
    #[must_use]
    pub fn render(&self, input: &str) -> Rendered {
        // Most strings are literals; skip the parse for those.
        if !has_placeholders(input) {
            return Rendered::literal(input);
        }

        let placeholders = parse_placeholders(input);
        if placeholders.is_empty() {
            return Rendered::literal(input);
        }

        let mut unresolved = Vec::new();
        let mut result = String::with_capacity(input.len());
        let mut last_end = 0;

        for placeholder in &placeholders {
            result.push_str(&input[last_end..placeholder.span.start]);

            if let Some(value) = self.captures.get(&placeholder.key) {
                result.push_str(&display_value(value));
            } else {
                result.push_str(&input[placeholder.span.clone()]);
                unresolved.push(placeholder.key.clone());
            }

            last_end = placeholder.span.end;
        }

        result.push_str(&input[last_end..]);

        Rendered { resolved: result, unresolved }
    }

    /// Resolves placeholders in every string leaf of a JSON tree.
    ///
    /// When a string leaf is exactly one placeholder, the captured JSON
    /// value is substituted with its original type (a captured number
    /// stays a number). Mixed strings render captured values as text.
    pub fn render_value(
        &self,
        input: &serde_json::Value,
        unresolved: &mut Vec<String>,
    ) -> serde_json::Value {
        match input {
            serde_json::Value::String(s) => {
                if let Some(key) = sole_placeholder(s) {
                    return self.captures.get(&key).map_or_else(
                        || {
                            unresolved.push(key);
                            input.clone()
                        },
                        Clone::clone,
                    );
                }
                let rendered = self.render(s);
                unresolved.extend(rendered.unresolved);
                serde_json::Value::String(rendered.resolved)
            }
            serde_json::Value::Array(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(|item| self.render_value(item, unresolved))
                    .collect(),
            ),
            serde_json::Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.render_value(v, unresolved)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

}

/// Returns the key when the whole string is a single placeholder.
fn sole_placeholder(input: &str) -> Option<String> {
    let placeholders = parse_placeholders(input);
    match placeholders.as_slice() {
        [only] if only.span == (0..input.len()) => Some(only.key.clone()),
        _ => None,
    }
}

/// Renders a captured JSON value into a string context.
///
/// Strings render without quotes so `/posts/{{id}}` yields `/posts/55`
/// whether the id was captured as a number or a string.
fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
