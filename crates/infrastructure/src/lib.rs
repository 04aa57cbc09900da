//! Infrastructure layer for the attest contract-test runner.
//!
//! Concrete adapters behind the application-layer ports: a reqwest HTTP
//! client, a file-based scenario catalog, and report writers.

pub mod adapters;
pub mod catalog;
pub mod report;

pub use adapters::ReqwestHttpClient;
pub use catalog::FileScenarioCatalog;
pub use report::{render_summary, write_jsonl};
