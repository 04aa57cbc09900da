//! File-based scenario catalog.
//!
//! Loads scenario definitions from a directory of YAML or JSON files.
//! Each file holds either a single scenario or a list of scenarios;
//! files are read in lexicographic name order so runs are reproducible.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use attest_application::ports::{ScenarioSource, ScenarioSourceError};
use attest_domain::Scenario;

/// A scenario definition file: one scenario or a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScenarioDocument {
    Many(Vec<Scenario>),
    One(Scenario),
}

impl ScenarioDocument {
    fn into_scenarios(self) -> Vec<Scenario> {
        match self {
            Self::Many(scenarios) => scenarios,
            Self::One(scenario) => vec![scenario],
        }
    }
}

/// Loads scenarios from `.yaml`, `.yml`, and `.json` files in a
/// directory. Other files are ignored.
pub struct FileScenarioCatalog {
    dir: PathBuf,
}

impl FileScenarioCatalog {
    /// Creates a catalog over the given directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the catalog directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn parse_file(path: &Path, content: &str) -> Result<Vec<Scenario>, ScenarioSourceError> {
        let file = path.display().to_string();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let document: ScenarioDocument = if is_json {
            serde_json::from_str(content).map_err(|e| ScenarioSourceError::Invalid {
                file,
                message: e.to_string(),
            })?
        } else {
            serde_yaml::from_str(content).map_err(|e| ScenarioSourceError::Invalid {
                file,
                message: e.to_string(),
            })?
        };

        Ok(document.into_scenarios())
    }

    fn is_definition_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                ext.eq_ignore_ascii_case("yaml")
                    || ext.eq_ignore_ascii_case("yml")
                    || ext.eq_ignore_ascii_case("json")
            })
    }
}

#[async_trait]
impl ScenarioSource for FileScenarioCatalog {
    async fn load(&self) -> Result<Vec<Scenario>, ScenarioSourceError> {
        if !self.dir.is_dir() {
            return Err(ScenarioSourceError::NotFound(
                self.dir.display().to_string(),
            ));
        }

        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| ScenarioSourceError::Io(e.to_string()))?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ScenarioSourceError::Io(e.to_string()))?
        {
            let path = entry.path();
            if path.is_file() && Self::is_definition_file(&path) {
                files.push(path);
            }
        }
        files.sort();

        let mut scenarios = Vec::new();
        for path in files {
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| ScenarioSourceError::Io(format!("{}: {e}", path.display())))?;
            let loaded = Self::parse_file(&path, &content)?;
            debug!(file = %path.display(), count = loaded.len(), "loaded scenario file");
            scenarios.extend(loaded);
        }

        Ok(scenarios)
    }
}
