//! Report writers.
//!
//! Machine-readable JSONL goes to stdout (one object per scenario) so a
//! run can be piped into other tooling; the human-readable summary is a
//! plain text block appended after the results.

use std::io::Write;

use attest_domain::{RunReport, RunResult};

/// Writes one compact JSON object per scenario result, newline-delimited.
///
/// # Errors
///
/// Returns an `io::Error` when serialization or the underlying write
/// fails.
pub fn write_jsonl(writer: &mut impl Write, results: &[RunResult]) -> std::io::Result<()> {
    for result in results {
        let line = serde_json::to_string(result)?;
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

/// Renders the human-readable run summary.
#[must_use]
pub fn render_summary(report: &RunReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("run {} ({})\n", report.run_id, report.started_at));

    for result in &report.results {
        let verdict = if result.passed { "PASS" } else { "FAIL" };
        out.push_str(&format!(
            "  {verdict} {} ({}ms)\n",
            result.scenario, result.duration_ms
        ));
        for failure in &result.failures {
            out.push_str(&format!("       - {failure}\n"));
        }
        for step in &result.steps {
            for observation in &step.observations {
                out.push_str(&format!("       ~ {}: {observation}\n", step.step));
            }
        }
    }

    out.push_str(&format!(
        "{} passed, {} failed, {} total ({}ms, {:.0}% pass rate)\n",
        report.passed,
        report.failed,
        report.total,
        report.duration_ms,
        report.pass_rate()
    ));

    out
}
