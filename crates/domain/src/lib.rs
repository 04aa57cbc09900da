//! Attest Domain - Core contract-test types
//!
//! This crate defines the domain model for the Attest contract-test
//! runner. All types here are pure Rust with no I/O dependencies.

pub mod assertion;
pub mod capture;
pub mod error;
pub mod report;
pub mod request;
pub mod response;
pub mod scenario;

pub use assertion::{Assertion, AssertionResult, ExpectMode, StatusExpectation, TypeTag};
pub use capture::{CaptureMap, CaptureRule};
pub use error::{DomainError, DomainResult};
pub use report::{RunReport, RunResult, StepOutcome, StepReport};
pub use request::{BaseUrl, HeaderParam, HttpMethod, QueryParam, QueryParams, RequestPlan};
pub use response::Response;
pub use scenario::{Scenario, Step, StepExpectations};
