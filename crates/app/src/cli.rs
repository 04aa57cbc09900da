//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

/// Declarative HTTP contract-test runner.
///
/// Runs named scenarios (ordered HTTP steps plus assertions) against a
/// single target server and reports one JSON result per scenario on
/// stdout, followed by a human-readable summary.
#[derive(Debug, Parser)]
#[command(name = "attest", version, about)]
pub struct Cli {
    /// Base URL all scenario paths are joined against.
    #[arg(long, env = "ATTEST_BASE_URL", value_name = "URL")]
    pub base_url: String,

    /// Directory of YAML/JSON scenario files to load in addition to the
    /// built-in suite.
    #[arg(long, value_name = "DIR")]
    pub scenarios: Option<PathBuf>,

    /// Only run scenarios whose name contains this substring.
    #[arg(long, value_name = "SUBSTRING")]
    pub filter: Option<String>,

    /// Only run scenarios carrying this tag.
    #[arg(long, value_name = "TAG")]
    pub tag: Option<String>,

    /// Per-scenario timeout in seconds.
    #[arg(long, value_name = "SECONDS", default_value_t = 30)]
    pub timeout: u64,

    /// Maximum scenarios in flight at once.
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub parallel: usize,

    /// Stop a step at its first failed assertion instead of collecting
    /// all failures.
    #[arg(long)]
    pub fail_fast: bool,

    /// Skip the built-in /posts suite.
    #[arg(long)]
    pub no_builtin: bool,

    /// Print matching scenario names without running anything.
    #[arg(long)]
    pub list: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_defaults() {
        let cli =
            Cli::try_parse_from(["attest", "--base-url", "http://localhost:3000"]).unwrap();
        assert_eq!(cli.base_url, "http://localhost:3000");
        assert_eq!(cli.timeout, 30);
        assert_eq!(cli.parallel, 1);
        assert!(!cli.fail_fast);
        assert!(!cli.no_builtin);
        assert!(!cli.list);
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "attest",
            "--base-url",
            "http://localhost:3000",
            "--scenarios",
            "./scenarios",
            "--filter",
            "create",
            "--tag",
            "crud",
            "--timeout",
            "5",
            "--parallel",
            "4",
            "--fail-fast",
            "--no-builtin",
        ])
        .unwrap();

        assert_eq!(cli.scenarios, Some(PathBuf::from("./scenarios")));
        assert_eq!(cli.filter.as_deref(), Some("create"));
        assert_eq!(cli.tag.as_deref(), Some("crud"));
        assert_eq!(cli.timeout, 5);
        assert_eq!(cli.parallel, 4);
        assert!(cli.fail_fast);
        assert!(cli.no_builtin);
    }

    #[test]
    fn test_base_url_is_required() {
        assert!(Cli::try_parse_from(["attest"]).is_err());
    }
}
