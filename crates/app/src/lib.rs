//! Composition root pieces for the `attest` binary.
//!
//! The CLI definition and the built-in suite live here so integration
//! tests can drive them without spawning the binary.

pub mod cli;
pub mod suite;

pub use cli::Cli;
pub use suite::builtin_scenarios;
