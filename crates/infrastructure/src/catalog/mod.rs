//! Scenario catalogs.

pub mod file;

pub use file::FileScenarioCatalog;
