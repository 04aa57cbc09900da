//! Run results and report aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// All expectations held (or were tolerantly observed).
    Passed,
    /// At least one expectation failed, the transport failed, or a
    /// required capture was missing.
    Failed,
    /// The step never ran because the scenario aborted earlier.
    Skipped,
}

/// Per-step diagnostic record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Step name.
    pub step: String,
    /// Outcome of the step.
    pub outcome: StepOutcome,
    /// Observed HTTP status, when a response was received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Failure messages (expected vs. actual), in evaluation order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
    /// Tolerant-mode observations and other non-fatal notes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub observations: Vec<String>,
}

impl StepReport {
    /// Creates a report for a step that never ran.
    #[must_use]
    pub fn skipped(step: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            outcome: StepOutcome::Skipped,
            status: None,
            failures: Vec::new(),
            observations: Vec::new(),
        }
    }
}

/// Result of running one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// Scenario name.
    pub scenario: String,
    /// Whether every step passed.
    pub passed: bool,
    /// All failure messages across steps, in order.
    #[serde(default)]
    pub failures: Vec<String>,
    /// Wall-clock duration of the scenario in milliseconds.
    pub duration_ms: u64,
    /// Per-step records.
    #[serde(default)]
    pub steps: Vec<StepReport>,
}

impl RunResult {
    /// Builds a result from step reports.
    ///
    /// The scenario passes when no step failed; skipped steps do not
    /// fail a scenario by themselves.
    #[must_use]
    pub fn from_steps(
        scenario: impl Into<String>,
        steps: Vec<StepReport>,
        duration_ms: u64,
    ) -> Self {
        let failures: Vec<String> = steps
            .iter()
            .flat_map(|s| s.failures.iter().cloned())
            .collect();
        let passed = steps.iter().all(|s| s.outcome != StepOutcome::Failed);

        Self {
            scenario: scenario.into(),
            passed,
            failures,
            duration_ms,
            steps,
        }
    }
}

/// Aggregated report for a whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique run identifier.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// One result per scenario, in registration order.
    pub results: Vec<RunResult>,
    /// Total number of scenarios.
    pub total: usize,
    /// Number of passing scenarios.
    pub passed: usize,
    /// Number of failing scenarios.
    pub failed: usize,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl RunReport {
    /// Builds a report from scenario results.
    #[must_use]
    pub fn new(results: Vec<RunResult>, started_at: DateTime<Utc>, duration_ms: u64) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = total - passed;

        Self {
            run_id: Uuid::now_v7(),
            started_at,
            results,
            total,
            passed,
            failed,
            duration_ms,
        }
    }

    /// Returns true if every scenario passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Pass rate as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn passed_step(name: &str) -> StepReport {
        StepReport {
            step: name.to_string(),
            outcome: StepOutcome::Passed,
            status: Some(200),
            failures: Vec::new(),
            observations: Vec::new(),
        }
    }

    fn failed_step(name: &str, message: &str) -> StepReport {
        StepReport {
            step: name.to_string(),
            outcome: StepOutcome::Failed,
            status: Some(500),
            failures: vec![message.to_string()],
            observations: Vec::new(),
        }
    }

    #[test]
    fn test_result_from_passing_steps() {
        let result = RunResult::from_steps("s", vec![passed_step("a"), passed_step("b")], 10);
        assert!(result.passed);
        assert!(result.failures.is_empty());
    }

    #[test]
    fn test_result_collects_failures_in_order() {
        let result = RunResult::from_steps(
            "s",
            vec![failed_step("a", "first"), failed_step("b", "second")],
            10,
        );
        assert!(!result.passed);
        assert_eq!(result.failures, vec!["first", "second"]);
    }

    #[test]
    fn test_skipped_steps_do_not_fail_scenario() {
        let result =
            RunResult::from_steps("s", vec![passed_step("a"), StepReport::skipped("b")], 5);
        assert!(result.passed);
    }

    #[test]
    fn test_empty_scenario_result_passes() {
        let result = RunResult::from_steps("empty", Vec::new(), 0);
        assert!(result.passed);
    }

    #[test]
    fn test_report_counts() {
        let results = vec![
            RunResult::from_steps("a", vec![passed_step("x")], 1),
            RunResult::from_steps("b", vec![failed_step("y", "boom")], 2),
        ];
        let report = RunReport::new(results, Utc::now(), 3);
        assert_eq!(report.total, 2);
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 1);
        assert!(!report.all_passed());
        assert_eq!(report.pass_rate(), 50.0);
    }
}
