//! Results of a class run and their rendering.

use serde::Serialize;
use std::io::{self, Write};
use termcolor::{Color, ColorSpec, WriteColor};

use crate::config::RunConfig;
use crate::diagnostics::LifecyclePhase;

// =============================================================================
// CORE TYPES
// =============================================================================

/// Outcome of a single test method.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TestResult {
    Pass {
        class: String,
        name: String,
    },
    Fail {
        class: String,
        name: String,
        phase: LifecyclePhase,
        error: String,
        /// Teardown failure that followed an earlier failure.
        suppressed: Option<String>,
    },
    Skipped {
        class: String,
        name: String,
        reason: String,
    },
}

impl TestResult {
    pub fn name(&self) -> &str {
        match self {
            TestResult::Pass { name, .. }
            | TestResult::Fail { name, .. }
            | TestResult::Skipped { name, .. } => name,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TestResult::Fail { .. })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TestSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl TestSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    /// Percentage of executed (non-skipped) tests that passed.
    pub fn success_rate(&self) -> f64 {
        let executed = self.passed + self.failed;
        if executed == 0 {
            return 0.0;
        }
        (self.passed as f64 / executed as f64) * 100.0
    }

    pub fn merge(&mut self, other: TestSummary) {
        self.passed += other.passed;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }
}

/// Results of one test class, in declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct ClassReport {
    pub class: String,
    pub results: Vec<TestResult>,
    /// Whether any test completed `before_each` during this run.
    pub initialized: bool,
}

impl ClassReport {
    pub fn summary(&self) -> TestSummary {
        partition_results(&self.results)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Counts results by outcome.
pub fn partition_results(results: &[TestResult]) -> TestSummary {
    results
        .iter()
        .fold(TestSummary::default(), |mut summary, result| {
            match result {
                TestResult::Pass { .. } => summary.passed += 1,
                TestResult::Fail { .. } => summary.failed += 1,
                TestResult::Skipped { .. } => summary.skipped += 1,
            }
            summary
        })
}

// =============================================================================
// REPORTING AND OUTPUT
// =============================================================================

/// Writes PASS/FAIL/SKIP lines, failure details and a summary line.
pub fn write_report<W: WriteColor>(
    out: &mut W,
    reports: &[ClassReport],
    config: &RunConfig,
) -> io::Result<TestSummary> {
    let mut summary = TestSummary::default();
    for report in reports {
        for result in &report.results {
            write_result(out, result, config)?;
        }
        summary.merge(report.summary());
    }

    writeln!(out)?;
    write!(out, "Test summary: total {}, ", summary.total())?;
    write_colored(out, "passed", Color::Green, config)?;
    write!(out, " {}, ", summary.passed)?;
    write_colored(out, "failed", Color::Red, config)?;
    write!(out, " {}, ", summary.failed)?;
    write_colored(out, "skipped", Color::Yellow, config)?;
    writeln!(out, " {}", summary.skipped)?;

    if summary.has_failures() {
        writeln!(out, "\nFailed tests:")?;
        for report in reports {
            for result in report.results.iter().filter(|r| r.is_failure()) {
                writeln!(out, "  - {}::{}", report.class, result.name())?;
            }
        }
    }
    Ok(summary)
}

fn write_result<W: WriteColor>(
    out: &mut W,
    result: &TestResult,
    config: &RunConfig,
) -> io::Result<()> {
    match result {
        TestResult::Pass { class, name } => {
            write_colored(out, "PASS", Color::Green, config)?;
            writeln!(out, ": {}::{}", class, name)
        }
        TestResult::Fail {
            class,
            name,
            phase,
            error,
            suppressed,
        } => {
            write_colored(out, "FAIL", Color::Red, config)?;
            writeln!(out, ": {}::{} ({})", class, name, phase)?;
            writeln!(out, "  Error: {}", error)?;
            if let Some(suppressed) = suppressed {
                writeln!(out, "  Suppressed teardown error: {}", suppressed)?;
            }
            Ok(())
        }
        TestResult::Skipped {
            class,
            name,
            reason,
        } => {
            write_colored(out, "SKIP", Color::Yellow, config)?;
            writeln!(out, ": {}::{} ({})", class, name, reason)
        }
    }
}

fn write_colored<W: WriteColor>(
    out: &mut W,
    text: &str,
    color: Color,
    config: &RunConfig,
) -> io::Result<()> {
    if !config.use_colors {
        return write!(out, "{}", text);
    }
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{}", text)?;
    out.reset()
}
