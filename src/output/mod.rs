//! Report files written at the end of a run.
//!
//! ```text
//! <results>/
//!   modules-summary.json      one entry per module
//!   combined-report.json      module-prefixed tests + coverage
//!   <module path>/report.json per module that produced data
//! ```
//!
//! Failures here are logged and never abort the run.

pub mod terminal;

pub use terminal::render_summary_table;

use crate::core::{CoverageRecord, ModuleResult, ModuleStatus, TestMethodRecord};
use crate::coverage::CoverageSummary;
use crate::io::write_file;
use crate::orchestrator::AggregateView;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "modules-summary.json";
pub const COMBINED_FILE: &str = "combined-report.json";
pub const MODULE_REPORT_FILE: &str = "report.json";

#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub generated_at: DateTime<Utc>,
    pub total_modules: usize,
    pub successful_modules: usize,
    pub failed_modules: usize,
    pub skipped_modules: usize,
    pub total_test_cases: usize,
    pub modules: Vec<ModuleSummary<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ModuleSummary<'a> {
    pub name: &'a str,
    pub status: ModuleStatus,
    pub test_cases: usize,
    pub correlated: usize,
    /// Tests whose recorded run failed or errored.
    pub failing_tests: usize,
    pub processing_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

impl<'a> ModuleSummary<'a> {
    fn from_result(result: &'a ModuleResult) -> Self {
        Self {
            name: result.name(),
            status: result.status(),
            test_cases: result.tests().len(),
            correlated: result.correlated_count(),
            failing_tests: result.failing_test_count(),
            processing_time_ms: result.elapsed().as_millis() as u64,
            error: result.error(),
        }
    }
}

impl<'a> RunSummary<'a> {
    pub fn from_results(results: &'a [ModuleResult]) -> Self {
        let count = |pred: fn(ModuleStatus) -> bool| results.iter().filter(|r| pred(r.status())).count();
        Self {
            generated_at: Utc::now(),
            total_modules: results.len(),
            successful_modules: count(|s| s.has_data()),
            failed_modules: count(|s| s.is_failure()),
            skipped_modules: count(|s| s == ModuleStatus::Skipped),
            total_test_cases: results.iter().map(|r| r.tests().len()).sum(),
            modules: results.iter().map(ModuleSummary::from_result).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ModuleReport<'a> {
    module: &'a str,
    status: ModuleStatus,
    coverage_summary: CoverageSummary,
    tests: &'a [TestMethodRecord],
    coverage: &'a [CoverageRecord],
}

#[derive(Debug, Serialize)]
struct CombinedReport<'a> {
    generated_at: DateTime<Utc>,
    total_tests: usize,
    correlated_tests: usize,
    #[serde(flatten)]
    view: &'a AggregateView,
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(value)?;
    write_file(path, &json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path.to_path_buf())
}

pub fn write_summary(results: &[ModuleResult], dir: &Path) -> Result<PathBuf> {
    write_json(&RunSummary::from_results(results), &dir.join(SUMMARY_FILE))
}

pub fn write_combined(aggregate: &AggregateView, dir: &Path) -> Result<PathBuf> {
    let report = CombinedReport {
        generated_at: Utc::now(),
        total_tests: aggregate.tests.len(),
        correlated_tests: aggregate.correlated_tests(),
        view: aggregate,
    };
    write_json(&report, &dir.join(COMBINED_FILE))
}

pub fn write_module_report(result: &ModuleResult, dir: &Path) -> Result<PathBuf> {
    let report = ModuleReport {
        module: result.name(),
        status: result.status(),
        coverage_summary: CoverageSummary::from_records(result.coverage()),
        tests: result.tests(),
        coverage: result.coverage(),
    };
    write_json(&report, &module_report_path(dir, result.name()))
}

/// `<dir>/<segment>/.../report.json` for a `/`-separated module name.
pub fn module_report_path(dir: &Path, module: &str) -> PathBuf {
    module
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(dir.to_path_buf(), |path, segment| path.join(sanitize_file_name(segment)))
        .join(MODULE_REPORT_FILE)
}

/// Write every report. Returns the files that were written.
pub fn write_reports(results: &[ModuleResult], aggregate: &AggregateView, dir: &Path) -> Vec<PathBuf> {
    let mut attempts = vec![write_summary(results, dir), write_combined(aggregate, dir)];
    attempts.extend(
        results
            .iter()
            .filter(|r| r.status().has_data())
            .map(|r| write_module_report(r, dir)),
    );

    attempts
        .into_iter()
        .filter_map(|attempt| match attempt {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::error!("{:#}", e);
                None
            }
        })
        .collect()
}

/// Replace characters that are unsafe in a single path component.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    match cleaned.trim() {
        "" | "." | ".." => "_".to_string(),
        trimmed => trimmed.to_string(),
    }
}
