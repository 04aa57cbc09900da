//! attest - declarative HTTP contract-test runner.
//!
//! Wires the CLI to the scenario registry, the runner, and the report
//! writers. JSONL results and the summary go to stdout; diagnostics go
//! to stderr so stdout stays machine-parsable.

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tracing::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use attest_application::ports::{HttpClientError, ScenarioSource, ScenarioSourceError};
use attest_application::{
    ApplicationError, EvaluationMode, RunnerConfig, ScenarioRegistry, ScenarioRunner,
};
use attest_domain::{BaseUrl, DomainError, Scenario};
use attest_infrastructure::{FileScenarioCatalog, ReqwestHttpClient, render_summary, write_jsonl};

use attest::cli::Cli;
use attest::suite::builtin_scenarios;

/// Configuration errors detected before any scenario runs. Exit code 2.
#[derive(Debug, Error)]
enum ConfigError {
    /// The base URL is not a valid http(s) URL.
    #[error("{0}")]
    BaseUrl(#[from] DomainError),

    /// Scenario registration failed (duplicate or invalid name).
    #[error("{0}")]
    Registry(#[from] ApplicationError),

    /// A scenario file could not be read or parsed.
    #[error("{0}")]
    Catalog(#[from] ScenarioSourceError),

    /// The HTTP client could not be constructed.
    #[error("{0}")]
    Client(#[from] HttpClientError),

    /// Writing results to stdout failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, ConfigError> {
    let base_url = BaseUrl::parse(&cli.base_url)?;

    let mut registry = ScenarioRegistry::new();
    if !cli.no_builtin {
        registry.register_all(builtin_scenarios())?;
    }
    if let Some(dir) = &cli.scenarios {
        let catalog = FileScenarioCatalog::new(dir);
        registry.register_all(catalog.load().await?)?;
    }

    let selected: Vec<Scenario> = registry
        .select(cli.filter.as_deref(), cli.tag.as_deref())
        .into_iter()
        .cloned()
        .collect();

    if cli.list {
        let mut stdout = std::io::stdout().lock();
        for scenario in &selected {
            writeln!(stdout, "{}", scenario.name)?;
        }
        return Ok(ExitCode::SUCCESS);
    }

    let client = Arc::new(ReqwestHttpClient::new()?);
    let config = RunnerConfig {
        timeout: Duration::from_secs(cli.timeout),
        parallelism: cli.parallel,
        evaluation: if cli.fail_fast {
            EvaluationMode::FailFast
        } else {
            EvaluationMode::CollectAll
        },
    };

    let runner = Arc::new(ScenarioRunner::new(client, base_url, config));
    let report = runner.run_all(selected).await;

    let mut stdout = std::io::stdout().lock();
    write_jsonl(&mut stdout, &report.results)?;
    write!(stdout, "\n{}", render_summary(&report))?;

    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
