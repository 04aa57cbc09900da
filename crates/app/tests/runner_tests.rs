//! End-to-end runs against an in-process `/posts` server.

#![allow(clippy::unwrap_used)]

mod support;

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use attest::suite::builtin_scenarios;
use attest_application::ports::ScenarioSource;
use attest_application::{RunnerConfig, ScenarioRunner};
use attest_domain::{
    Assertion, BaseUrl, RunResult, Scenario, Step, StepExpectations, StepOutcome,
};
use attest_infrastructure::{FileScenarioCatalog, ReqwestHttpClient, write_jsonl};

use support::MockPosts;

fn runner_for(server: &MockPosts, config: RunnerConfig) -> Arc<ScenarioRunner> {
    let client = Arc::new(ReqwestHttpClient::new().unwrap());
    let base_url = BaseUrl::parse(&server.base_url()).unwrap();
    Arc::new(ScenarioRunner::new(client, base_url, config))
}

#[tokio::test]
async fn test_builtin_suite_runs_green() {
    let server = MockPosts::start().await;
    let runner = runner_for(&server, RunnerConfig::default());

    let report = runner.run_all(builtin_scenarios()).await;

    assert!(
        report.all_passed(),
        "failing scenarios: {:?}",
        report
            .results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| (&r.scenario, &r.failures))
            .collect::<Vec<_>>()
    );
    assert_eq!(report.total, 10);

    // Results come back in suite order.
    let names: Vec<_> = report.results.iter().map(|r| r.scenario.as_str()).collect();
    assert_eq!(names[0], "list posts");
    assert_eq!(names[9], "post lifecycle");
}

#[tokio::test]
async fn test_tolerant_scenarios_record_observations() {
    let server = MockPosts::start().await;
    let runner = runner_for(&server, RunnerConfig::default());

    let report = runner.run_all(builtin_scenarios()).await;

    // The protected route answers 401; the scenario still passes but
    // keeps the observed status.
    let protected = report
        .results
        .iter()
        .find(|r| r.scenario == "create post on protected route")
        .unwrap();
    assert!(protected.passed);
    assert!(protected.steps[0].observations[0].contains("observed 401"));

    // DELETE /posts/999 matches its expected 404, so nothing to observe.
    let delete_missing = report
        .results
        .iter()
        .find(|r| r.scenario == "delete missing post")
        .unwrap();
    assert!(delete_missing.passed);
    assert!(delete_missing.steps[0].observations.is_empty());
}

#[tokio::test]
async fn test_dependency_missing_makes_no_network_attempt() {
    let server = MockPosts::start().await;
    let runner = runner_for(&server, RunnerConfig::default());

    let scenario = Scenario::new("create then read")
        .with_step(
            Step::post("create", "/posts")
                .with_body(serde_json::json!({"title": "New Post"}))
                .expecting(StepExpectations::status(201))
                .capture("token", "/missing"),
        )
        .with_step(
            Step::get("read", "/posts/{{token}}").expecting(StepExpectations::status(200)),
        );

    let result = runner.run_scenario(&scenario).await;

    assert!(!result.passed);
    assert_eq!(result.steps[1].outcome, StepOutcome::Failed);
    assert!(result.steps[1].failures[0].contains("dependency missing"));

    // Only the create step reached the server.
    assert_eq!(server.request_count(), 1);
    assert_eq!(server.requests(), vec!["POST /posts"]);
}

#[tokio::test]
async fn test_scenario_timeout_skips_only_remaining_steps() {
    let server = MockPosts::start().await;
    let runner = runner_for(
        &server,
        RunnerConfig {
            timeout: Duration::from_millis(500),
            ..RunnerConfig::default()
        },
    );

    let scenario = Scenario::new("slow endpoint")
        .with_step(Step::get("list", "/posts").expecting(StepExpectations::status(200)))
        .with_step(Step::get("hang", "/slow").expecting(StepExpectations::status(200)));

    let result = runner.run_scenario(&scenario).await;
    assert!(!result.passed);
    assert!(result.failures[0].contains("timed out"));

    // The step that finished before the budget expired keeps its report.
    assert_eq!(result.steps[0].outcome, StepOutcome::Passed);
    assert_eq!(result.steps[0].status, Some(200));
    assert_eq!(result.steps[1].outcome, StepOutcome::Skipped);
}

#[tokio::test]
async fn test_id_set_filter_is_order_independent() {
    let server = MockPosts::start().await;
    let runner = runner_for(&server, RunnerConfig::default());

    // Query ids in reverse of the server's natural order; membership
    // assertions must still hold.
    let scenario = Scenario::new("reverse order filter").with_step(
        Step::get("filter", "/posts")
            .with_query("id", "60")
            .with_query("id", "55")
            .expecting(
                StepExpectations::status(200)
                    .assert(Assertion::ArrayContains {
                        property: "id".to_string(),
                        value: serde_json::json!(55),
                    })
                    .assert(Assertion::ArrayContains {
                        property: "id".to_string(),
                        value: serde_json::json!(60),
                    }),
            ),
    );

    let result = runner.run_scenario(&scenario).await;
    assert!(result.passed, "failures: {:?}", result.failures);
}

#[tokio::test]
async fn test_read_only_scenario_is_idempotent() {
    let server = MockPosts::start().await;
    let runner = runner_for(&server, RunnerConfig::default());

    let scenario = builtin_scenarios()
        .into_iter()
        .find(|s| s.name == "list posts returns titled posts")
        .unwrap();

    let first = runner.run_scenario(&scenario).await;
    let second = runner.run_scenario(&scenario).await;

    assert_eq!(first.passed, second.passed);
    assert_eq!(first.failures, second.failures);
    let outcomes = |r: &RunResult| {
        r.steps
            .iter()
            .map(|s| (s.step.clone(), s.outcome, s.status))
            .collect::<Vec<_>>()
    };
    assert_eq!(outcomes(&first), outcomes(&second));
}

#[tokio::test]
async fn test_jsonl_output_shape() {
    let server = MockPosts::start().await;
    let runner = runner_for(&server, RunnerConfig::default());

    let scenarios = vec![
        Scenario::new("passing")
            .with_step(Step::get("list", "/posts").expecting(StepExpectations::status(200))),
        Scenario::new("failing")
            .with_step(Step::get("read", "/posts/999").expecting(StepExpectations::status(200))),
    ];

    let report = runner.run_all(scenarios).await;

    let mut buffer = Vec::new();
    write_jsonl(&mut buffer, &report.results).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["scenario"], "passing");
    assert_eq!(first["passed"], true);
    assert!(first["duration_ms"].is_number());
    assert_eq!(first["steps"][0]["outcome"], "passed");

    let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second["passed"], false);
    assert_eq!(second["steps"][0]["status"], 404);
    assert!(
        second["failures"][0]
            .as_str()
            .unwrap()
            .contains("expected status = 200")
    );
}

#[tokio::test]
async fn test_file_catalog_scenarios_run_against_server() {
    let server = MockPosts::start().await;
    let runner = runner_for(&server, RunnerConfig::default());

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("read-post.yaml"),
        concat!(
            "name: read seeded post\n",
            "steps:\n",
            "  - name: read\n",
            "    method: GET\n",
            "    path: /posts/1\n",
            "    expect:\n",
            "      status: 200\n",
        ),
    )
    .unwrap();

    let catalog = FileScenarioCatalog::new(dir.path());
    let scenarios = catalog.load().await.unwrap();
    assert_eq!(scenarios.len(), 1);

    let report = runner.run_all(scenarios).await;
    assert!(report.all_passed(), "failures: {:?}", report.results);
}

#[tokio::test]
async fn test_parallel_run_keeps_registration_order() {
    let server = MockPosts::start().await;
    let runner = runner_for(
        &server,
        RunnerConfig {
            parallelism: 4,
            ..RunnerConfig::default()
        },
    );

    let scenarios: Vec<Scenario> = (0..8)
        .map(|i| {
            Scenario::new(format!("scenario {i}"))
                .with_step(Step::get("list", "/posts").expecting(StepExpectations::status(200)))
        })
        .collect();

    let report = runner.run_all(scenarios).await;
    assert!(report.all_passed());

    let names: Vec<_> = report.results.iter().map(|r| r.scenario.clone()).collect();
    let expected: Vec<_> = (0..8).map(|i| format!("scenario {i}")).collect();
    assert_eq!(names, expected);
}
