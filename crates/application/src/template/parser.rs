//! Placeholder parser for `{{key}}` syntax
//!
//! Parses strings to extract capture references with their positions.

use std::ops::Range;

/// A parsed placeholder in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// The capture key (without `{{ }}`).
    pub key: String,

    /// Byte range in the original string where this placeholder appears.
    pub span: Range<usize>,
}

impl Placeholder {
    /// Creates a new placeholder reference.
    #[must_use]
    pub fn new(key: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            key: key.into(),
            span,
        }
    }
}

/// Parses a string and extracts all `{{key}}` placeholders.
///
/// # Examples
///
/// ```
/// use attest_application::template::parse_placeholders;
///
/// let refs = parse_placeholders("/posts/{{id}}/comments/{{comment_id}}");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].key, "id");
/// assert_eq!(refs[1].key, "comment_id");
/// ```
#[must_use]
pub fn parse_placeholders(input: &str) -> Vec<Placeholder> {
    let mut placeholders = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if ch == '{' {
            if let Some((_, next_ch)) = chars.peek() {
                if *next_ch == '{' {
                    chars.next(); // consume second {
                    let start = i;
                    let mut key = String::new();
                    let mut found_end = false;

                    // Read until }}
                    while let Some((_, ch)) = chars.next() {
                        if ch == '}' {
                            if let Some((end_idx, '}')) = chars.peek() {
                                let end = *end_idx + 1;
                                chars.next(); // consume second }

                                let trimmed = key.trim().to_string();
                                if !trimmed.is_empty() {
                                    placeholders.push(Placeholder::new(trimmed, start..end));
                                }
                                found_end = true;
                                break;
                            }
                        }
                        key.push(ch);
                    }

                    // No closing }}; stop to avoid an infinite loop
                    if !found_end {
                        break;
                    }
                }
            }
        }
    }

    placeholders
}

/// Returns true if the input string contains any placeholders.
#[must_use]
pub fn has_placeholders(input: &str) -> bool {
    input.contains("{{") && input.contains("}}")
}
