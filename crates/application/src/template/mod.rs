//! Placeholder parsing and resolution for `{{key}}` templates.

pub mod engine;
pub mod parser;

pub use engine::{Rendered, TemplateEngine};
pub use parser::{Placeholder, has_placeholders, parse_placeholders};
