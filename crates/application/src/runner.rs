//! Scenario runner.
//!
//! Executes scenarios step by step: resolves templates against the
//! capture map, issues requests through the `HttpClient` port, evaluates
//! expectations, and threads captured values into later steps. Steps run
//! strictly sequentially within a scenario; scenarios are independent
//! and may run concurrently across workers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use attest_domain::{
    BaseUrl, CaptureMap, ExpectMode, RequestPlan, Response, RunReport, RunResult, Scenario, Step,
    StepOutcome, StepReport,
};

use crate::engine::{AssertionEngine, EvaluationMode};
use crate::ports::HttpClient;
use crate::template::TemplateEngine;

/// Lifecycle of one scenario run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioState {
    /// Registered but not started.
    Pending,
    /// Steps are executing.
    Running,
    /// Every step passed.
    Passed,
    /// At least one step failed or the budget expired.
    Failed,
}

/// Runner configuration.
#[derive(Debug, Clone, Copy)]
pub struct RunnerConfig {
    /// Per-scenario wall-clock budget. On expiry the scenario reports
    /// failed and its remaining steps are skipped.
    pub timeout: Duration,
    /// Maximum scenarios in flight at once.
    pub parallelism: usize,
    /// Assertion accumulation mode within a step.
    pub evaluation: EvaluationMode,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            parallelism: 1,
            evaluation: EvaluationMode::CollectAll,
        }
    }
}

/// Outcome of one step plus its effect on the rest of the scenario.
struct StepExecution {
    report: StepReport,
    abort_scenario: bool,
}

/// Executes scenarios against a configured base URL.
pub struct ScenarioRunner {
    client: Arc<dyn HttpClient>,
    base_url: BaseUrl,
    config: RunnerConfig,
    engine: AssertionEngine,
}

impl ScenarioRunner {
    /// Creates a runner.
    #[must_use]
    pub fn new(client: Arc<dyn HttpClient>, base_url: BaseUrl, config: RunnerConfig) -> Self {
        let engine = AssertionEngine::with_mode(config.evaluation);
        Self {
            client,
            base_url,
            config,
            engine,
        }
    }

    /// Runs a single scenario to completion and returns its result.
    ///
    /// Never fails: every step-level problem is folded into the
    /// `RunResult`.
    pub async fn run_scenario(&self, scenario: &Scenario) -> RunResult {
        let start = Instant::now();
        info!(
            scenario = %scenario.name,
            steps = scenario.len(),
            state = ?ScenarioState::Running,
            "scenario started"
        );

        let (steps, timed_out) = self.run_steps(scenario).await;
        let duration_ms = elapsed_ms(start);

        let result = if timed_out {
            // Completed steps keep their real outcomes and diagnostics;
            // only the in-flight and remaining steps were skipped.
            let mut failures: Vec<String> = steps
                .iter()
                .flat_map(|s| s.failures.iter().cloned())
                .collect();
            failures.push(format!(
                "scenario timed out after {}ms",
                self.config.timeout.as_millis()
            ));
            RunResult {
                scenario: scenario.name.clone(),
                passed: false,
                failures,
                duration_ms,
                steps,
            }
        } else {
            RunResult::from_steps(&scenario.name, steps, duration_ms)
        };

        let state = if result.passed {
            ScenarioState::Passed
        } else {
            ScenarioState::Failed
        };
        info!(scenario = %scenario.name, ?state, duration_ms, "scenario finished");

        result
    }

    /// Runs scenarios across bounded parallel workers.
    ///
    /// Each scenario's capture map is private, so the only shared
    /// resource is the target server. Results come back in input order
    /// regardless of completion order.
    pub async fn run_all(self: &Arc<Self>, scenarios: Vec<Scenario>) -> RunReport {
        let started_at = Utc::now();
        let start = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism.max(1)));

        let mut handles = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            let runner = Arc::clone(self);
            let semaphore = Arc::clone(&semaphore);
            let name = scenario.name.clone();
            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire().await;
                runner.run_scenario(&scenario).await
            });
            handles.push((name, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => results.push(RunResult {
                    scenario: name,
                    passed: false,
                    failures: vec![format!("internal error: {e}")],
                    duration_ms: 0,
                    steps: Vec::new(),
                }),
            }
        }

        RunReport::new(results, started_at, elapsed_ms(start))
    }

    /// Executes all steps of one scenario sequentially against the
    /// scenario's wall-clock budget.
    ///
    /// Each step runs under the remaining budget, so steps that finish
    /// before expiry keep their reports; the in-flight step and
    /// everything after it are skipped. Returns the reports and whether
    /// the budget expired.
    async fn run_steps(&self, scenario: &Scenario) -> (Vec<StepReport>, bool) {
        let deadline = Instant::now() + self.config.timeout;
        let mut captures = CaptureMap::new();
        let mut reports = Vec::with_capacity(scenario.len());
        let mut aborted = false;
        let mut timed_out = false;

        for step in &scenario.steps {
            if aborted || timed_out {
                debug!(scenario = %scenario.name, step = %step.name, "step skipped");
                reports.push(StepReport::skipped(&step.name));
                continue;
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            let Ok(execution) =
                tokio::time::timeout(remaining, self.run_step(step, &mut captures)).await
            else {
                warn!(scenario = %scenario.name, step = %step.name, "scenario budget expired");
                timed_out = true;
                reports.push(StepReport::skipped(&step.name));
                continue;
            };

            if execution.abort_scenario {
                warn!(
                    scenario = %scenario.name,
                    step = %step.name,
                    "scenario aborted: required capture never produced"
                );
                aborted = true;
            }
            reports.push(execution.report);
        }

        (reports, timed_out)
    }

    /// Executes one step: resolve, send, evaluate, capture.
    async fn run_step(&self, step: &Step, captures: &mut CaptureMap) -> StepExecution {
        let mut failures = Vec::new();
        let mut observations = Vec::new();

        // Resolve all templates before touching the network.
        let plan = match self.resolve_step(step, captures) {
            Ok(plan) => plan,
            Err(missing) => {
                // Dependency-aware abort: an earlier step failed to
                // produce a value this step's templates require, so no
                // network attempt is made and the scenario stops here.
                failures.push(format!(
                    "dependency missing: value(s) never captured: {}",
                    missing.join(", ")
                ));
                return StepExecution {
                    report: StepReport {
                        step: step.name.clone(),
                        outcome: StepOutcome::Failed,
                        status: None,
                        failures,
                        observations,
                    },
                    abort_scenario: true,
                };
            }
        };

        debug!(step = %step.name, method = %plan.method, url = %plan.url, "executing request");

        let response = match self.client.execute(&plan).await {
            Ok(response) => response,
            Err(e) => {
                // Transport failure is fatal to this step only; later
                // steps run unless they depend on this step's captures.
                failures.push(format!("network error: {e}"));
                return StepExecution {
                    report: StepReport {
                        step: step.name.clone(),
                        outcome: StepOutcome::Failed,
                        status: None,
                        failures,
                        observations,
                    },
                    abort_scenario: false,
                };
            }
        };

        let status_matched = self.evaluate_status(step, &response, &mut failures, &mut observations);

        // In tolerant mode a status mismatch skips body assertions;
        // everything else evaluates them.
        let run_assertions =
            status_matched || step.expect.mode == ExpectMode::Strict;
        if run_assertions {
            for result in self.engine.evaluate(&step.expect.assertions, &response) {
                if !result.passed {
                    let message = result
                        .message
                        .unwrap_or_else(|| "assertion failed".to_string());
                    failures.push(format!("{}: {message}", result.assertion.description()));
                }
            }
        }

        // Captures run on every received response, even when assertions
        // failed, so later steps stay diagnosable.
        Self::extract_captures(step, &response, captures, &mut failures, &mut observations);

        let outcome = if failures.is_empty() {
            StepOutcome::Passed
        } else {
            StepOutcome::Failed
        };

        StepExecution {
            report: StepReport {
                step: step.name.clone(),
                outcome,
                status: Some(response.status),
                failures,
                observations,
            },
            abort_scenario: false,
        }
    }

    /// Resolves the step's templates into a request plan.
    ///
    /// Returns the deduplicated missing capture keys on failure.
    fn resolve_step(&self, step: &Step, captures: &CaptureMap) -> Result<RequestPlan, Vec<String>> {
        let engine = TemplateEngine::new(captures);
        let mut missing: Vec<String> = Vec::new();

        let path = engine.render(&step.path);
        missing.extend(path.unresolved);

        let mut query = Vec::with_capacity(step.query.len());
        for param in step.query.iter() {
            let value = engine.render(&param.value);
            missing.extend(value.unresolved);
            query.push((param.key.clone(), value.resolved));
        }

        let mut headers = Vec::with_capacity(step.headers.len());
        for header in &step.headers {
            let value = engine.render(&header.value);
            missing.extend(value.unresolved);
            headers.push((header.name.clone(), value.resolved));
        }

        let body = step.body.as_ref().map(|body| {
            let mut unresolved = Vec::new();
            let rendered = engine.render_value(body, &mut unresolved);
            missing.extend(unresolved);
            rendered
        });

        if !missing.is_empty() {
            // First-occurrence order; a key may repeat across path,
            // query, and body.
            let mut unique: Vec<String> = Vec::with_capacity(missing.len());
            for key in missing {
                if !unique.contains(&key) {
                    unique.push(key);
                }
            }
            return Err(unique);
        }

        Ok(RequestPlan {
            method: step.method,
            url: self.base_url.join(&path.resolved),
            query,
            headers,
            body,
        })
    }

    /// Evaluates the step's status rule. Returns whether it matched.
    fn evaluate_status(
        &self,
        step: &Step,
        response: &Response,
        failures: &mut Vec<String>,
        observations: &mut Vec<String>,
    ) -> bool {
        let Some(expected) = &step.expect.status else {
            return true;
        };

        if expected.matches(response.status) {
            return true;
        }

        match step.expect.mode {
            ExpectMode::Strict => {
                failures.push(format!(
                    "expected status {}, observed {}",
                    expected.description(),
                    response.status
                ));
            }
            ExpectMode::Tolerant => {
                let note = format!(
                    "expected status {}, observed {}",
                    expected.description(),
                    response.status
                );
                warn!(step = %step.name, %note, "tolerant status mismatch");
                observations.push(note);
            }
        }
        false
    }

    /// Applies the step's capture rules to the response body.
    fn extract_captures(
        step: &Step,
        response: &Response,
        captures: &mut CaptureMap,
        failures: &mut Vec<String>,
        observations: &mut Vec<String>,
    ) {
        if step.captures.is_empty() {
            return;
        }

        let Some(body) = response.body_json() else {
            for rule in &step.captures {
                observations.push(format!(
                    "capture '{}' skipped: body is not valid JSON",
                    rule.key
                ));
            }
            return;
        };

        for rule in &step.captures {
            match rule.extract(&body) {
                Some(value) => {
                    debug!(key = %rule.key, %value, "captured value");
                    if let Err(e) = captures.insert(&rule.key, value) {
                        failures.push(e.to_string());
                    }
                }
                None => {
                    observations.push(format!(
                        "capture '{}': pointer '{}' not found in response body",
                        rule.key, rule.pointer
                    ));
                }
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
