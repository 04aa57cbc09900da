//! Application layer for the attest contract-test runner.
//!
//! Orchestrates scenario execution over the domain model: registers
//! scenarios, resolves `{{key}}` templates against captured values,
//! evaluates assertions, and produces run reports. Network and storage
//! access go through the ports defined here; the infrastructure layer
//! provides the adapters.

pub mod engine;
pub mod error;
pub mod ports;
pub mod registry;
pub mod runner;
pub mod template;

pub use engine::{AssertionEngine, EvaluationMode};
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{HttpClient, HttpClientError, ScenarioSource, ScenarioSourceError};
pub use registry::ScenarioRegistry;
pub use runner::{RunnerConfig, ScenarioRunner, ScenarioState};
pub use template::{Rendered, TemplateEngine};
