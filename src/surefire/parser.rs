//! Surefire `TEST-*.xml` reader.

use crate::core::{ExecutionStatus, TestExecution};
use crate::coverage::handlers::parse_count;
use crate::coverage::parser::read_attributes;
use crate::errors::ExecutionReportError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One `<testcase>`.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseResult {
    /// `classname` attribute, e.g. `com.example.CalculatorTest`.
    pub class_name: String,
    /// Method name with any invocation suffix removed.
    pub method_name: String,
    pub execution: TestExecution,
}

/// One report file. Counts come from the `<testsuite>` attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuiteReport {
    pub name: String,
    pub tests: u32,
    pub failures: u32,
    pub errors: u32,
    pub skipped: u32,
    pub time_secs: f64,
    pub cases: Vec<CaseResult>,
}

impl SuiteReport {
    pub fn passed(&self) -> u32 {
        self.tests
            .saturating_sub(self.failures)
            .saturating_sub(self.errors)
            .saturating_sub(self.skipped)
    }

    /// Passed tests as a percentage of all tests, 0 for an empty suite.
    pub fn success_rate(&self) -> f64 {
        if self.tests == 0 {
            0.0
        } else {
            f64::from(self.passed()) / f64::from(self.tests) * 100.0
        }
    }
}

/// Read and parse one report, refusing files over `max_bytes`.
pub fn parse_surefire_report(path: &Path, max_bytes: u64) -> Result<SuiteReport, ExecutionReportError> {
    let io_error = |source| ExecutionReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let size = fs::metadata(path).map_err(io_error)?.len();
    if size > max_bytes {
        return Err(ExecutionReportError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit: max_bytes,
        });
    }
    let bytes = fs::read(path).map_err(io_error)?;
    parse_surefire_str(&String::from_utf8_lossy(&bytes), path)
}

/// Parse report XML held in memory. `path` is only used for error messages.
///
/// A `<testsuites>` wrapper with several suites is folded into one report.
pub fn parse_surefire_str(xml: &str, path: &Path) -> Result<SuiteReport, ExecutionReportError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut report = SuiteReport::default();
    let mut saw_suite = false;
    let mut current: Option<CaseResult> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| malformed(path, reader.error_position() as u64, e.to_string()))?;
        let position = reader.buffer_position() as u64;

        match event {
            Event::Start(element) => match element.local_name().as_ref() {
                b"testsuite" => {
                    saw_suite = true;
                    add_suite(&mut report, &element).map_err(|m| malformed(path, position, m))?;
                }
                b"testcase" => {
                    current = Some(start_case(&element).map_err(|m| malformed(path, position, m))?);
                }
                name => {
                    if let Some(case) = current.as_mut() {
                        apply_outcome(case, name, &element).map_err(|m| malformed(path, position, m))?;
                    }
                }
            },
            Event::Empty(element) => match element.local_name().as_ref() {
                b"testsuite" => {
                    saw_suite = true;
                    add_suite(&mut report, &element).map_err(|m| malformed(path, position, m))?;
                }
                b"testcase" => {
                    report
                        .cases
                        .push(start_case(&element).map_err(|m| malformed(path, position, m))?);
                }
                name => {
                    if let Some(case) = current.as_mut() {
                        apply_outcome(case, name, &element).map_err(|m| malformed(path, position, m))?;
                    }
                }
            },
            Event::End(element) if element.local_name().as_ref() == b"testcase" => {
                if let Some(case) = current.take() {
                    report.cases.push(case);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_suite {
        return Err(ExecutionReportError::NoSuite {
            path: path.to_path_buf(),
        });
    }
    Ok(report)
}

fn malformed(path: &Path, position: u64, message: impl Into<String>) -> ExecutionReportError {
    ExecutionReportError::Malformed {
        path: path.to_path_buf(),
        position,
        message: message.into(),
    }
}

fn add_suite(report: &mut SuiteReport, element: &BytesStart<'_>) -> Result<(), String> {
    let attrs = read_attributes(element)?;
    let count = |key: &str| attrs.get(key).map(|v| parse_count(v)).unwrap_or(0);
    if report.name.is_empty() {
        report.name = attrs.get("name").cloned().unwrap_or_default();
    }
    report.tests += count("tests");
    report.failures += count("failures");
    report.errors += count("errors");
    report.skipped += count("skipped");
    report.time_secs += parse_seconds(&attrs);
    Ok(())
}

fn start_case(element: &BytesStart<'_>) -> Result<CaseResult, String> {
    let attrs = read_attributes(element)?;
    let name = attrs.get("name").map(String::as_str).unwrap_or_default();
    Ok(CaseResult {
        class_name: attrs.get("classname").cloned().unwrap_or_default(),
        method_name: base_method_name(name).to_string(),
        execution: TestExecution::new(ExecutionStatus::Passed, parse_seconds(&attrs)),
    })
}

/// `<failure>`, `<error>` and `<skipped>` set the outcome of the open case.
/// Rerun and flaky entries are ignored: the case's own outcome stands.
fn apply_outcome(case: &mut CaseResult, element_name: &[u8], element: &BytesStart<'_>) -> Result<(), String> {
    let status = match element_name {
        b"failure" => ExecutionStatus::Failed,
        b"error" => ExecutionStatus::Error,
        b"skipped" => ExecutionStatus::Skipped,
        _ => return Ok(()),
    };
    if case.execution.status != ExecutionStatus::Passed {
        return Ok(());
    }
    let attrs = read_attributes(element)?;
    case.execution.status = status;
    case.execution.message = attrs.get("message").filter(|m| !m.is_empty()).cloned();
    case.execution.error_type = attrs.get("type").filter(|t| !t.is_empty()).cloned();
    Ok(())
}

/// Seconds from a `time` attribute. Surefire groups thousands (`1,234.5`).
fn parse_seconds(attrs: &HashMap<String, String>) -> f64 {
    attrs
        .get("time")
        .and_then(|raw| raw.replace(',', "").trim().parse::<f64>().ok())
        .filter(|t| t.is_finite() && *t >= 0.0)
        .unwrap_or(0.0)
}

/// `testAdd(int, int)[2]` and `testAdd{int}[2]` become `testAdd`.
pub fn base_method_name(name: &str) -> &str {
    name.split(['(', '[', '{']).next().unwrap_or(name).trim()
}
