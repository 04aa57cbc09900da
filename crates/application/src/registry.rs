//! Scenario registry.
//!
//! Holds the named scenarios of a run in registration order. Names are
//! the identity used by reports and filtering, so duplicates are
//! rejected at registration time.

use attest_domain::{DomainError, Scenario};

use crate::error::{ApplicationError, ApplicationResult};

/// Ordered, duplicate-rejecting collection of scenarios.
#[derive(Debug, Default)]
pub struct ScenarioRegistry {
    scenarios: Vec<Scenario>,
}

impl ScenarioRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scenarios: Vec::new(),
        }
    }

    /// Registers a scenario.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyScenarioName` for a nameless scenario,
    /// `DomainError::InvalidCapturePointer` for a capture rule whose
    /// pointer could never resolve, and
    /// `ApplicationError::DuplicateScenario` when the name is already
    /// taken.
    pub fn register(&mut self, scenario: Scenario) -> ApplicationResult<()> {
        if scenario.name.trim().is_empty() {
            return Err(DomainError::EmptyScenarioName.into());
        }
        if self.scenarios.iter().any(|s| s.name == scenario.name) {
            return Err(ApplicationError::DuplicateScenario(scenario.name));
        }
        for step in &scenario.steps {
            for rule in &step.captures {
                rule.validate()?;
            }
        }
        self.scenarios.push(scenario);
        Ok(())
    }

    /// Registers many scenarios, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Propagates the first registration failure.
    pub fn register_all(
        &mut self,
        scenarios: impl IntoIterator<Item = Scenario>,
    ) -> ApplicationResult<()> {
        for scenario in scenarios {
            self.register(scenario)?;
        }
        Ok(())
    }

    /// Iterates scenarios in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    /// Returns scenarios matching an optional name substring and an
    /// optional tag, in registration order.
    #[must_use]
    pub fn select(&self, filter: Option<&str>, tag: Option<&str>) -> Vec<&Scenario> {
        self.scenarios
            .iter()
            .filter(|s| filter.is_none_or(|f| s.name.contains(f)))
            .filter(|s| tag.is_none_or(|t| s.has_tag(t)))
            .collect()
    }

    /// Returns the number of registered scenarios.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Returns true if no scenarios are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
