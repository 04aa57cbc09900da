//! Ports (interfaces) the application layer depends on.

mod http_client;
mod scenario_source;

pub use http_client::{HttpClient, HttpClientError};
pub use scenario_source::{ScenarioSource, ScenarioSourceError};
