//! Module descriptors and per-module outcomes.

use super::coverage::CoverageRecord;
use super::test_method::TestMethodRecord;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MANIFEST: &str = "pom.xml";
pub const DEFAULT_SOURCE_DIR: &str = "src/main/java";
pub const DEFAULT_TEST_DIR: &str = "src/test/java";
pub const DEFAULT_COVERAGE_DIR: &str = "target/site/jacoco";
pub const DEFAULT_EXECUTION_DIR: &str = "target/surefire-reports";

/// An independently buildable unit with its own tests and coverage reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDescriptor {
    pub name: String,
    pub root: PathBuf,
    pub source_dir: PathBuf,
    pub test_dir: PathBuf,
    pub coverage_dir: PathBuf,
    /// Test-run reports (`TEST-*.xml`).
    pub execution_dir: PathBuf,
    pub manifest: PathBuf,
    /// Set when pre-validation failed; such modules are never processed.
    pub validation_error: Option<String>,
}

impl ModuleDescriptor {
    /// Descriptor with the conventional Maven layout under `root`.
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            name: name.into(),
            source_dir: root.join(DEFAULT_SOURCE_DIR),
            test_dir: root.join(DEFAULT_TEST_DIR),
            coverage_dir: root.join(DEFAULT_COVERAGE_DIR),
            execution_dir: root.join(DEFAULT_EXECUTION_DIR),
            manifest: root.join(DEFAULT_MANIFEST),
            root,
            validation_error: None,
        }
    }

    pub fn with_test_dir(mut self, relative: impl AsRef<Path>) -> Self {
        self.test_dir = self.root.join(relative);
        self
    }

    pub fn with_coverage_dir(mut self, relative: impl AsRef<Path>) -> Self {
        self.coverage_dir = self.root.join(relative);
        self
    }

    pub fn with_execution_dir(mut self, relative: impl AsRef<Path>) -> Self {
        self.execution_dir = self.root.join(relative);
        self
    }

    pub fn with_validation_error(mut self, message: impl Into<String>) -> Self {
        self.validation_error = Some(message.into());
        self
    }

    pub fn is_valid(&self) -> bool {
        self.validation_error.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModuleStatus {
    Success,
    PartialSuccess,
    Failed,
    Skipped,
    /// Deadline expired; reported as a failure.
    TimedOut,
}

impl ModuleStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::PartialSuccess => "PARTIAL_SUCCESS",
            Self::Failed => "FAILED",
            Self::Skipped => "SKIPPED",
            Self::TimedOut => "TIMED_OUT",
        }
    }

    /// Outcomes whose data feeds the combined view.
    pub fn has_data(&self) -> bool {
        matches!(self, Self::Success | Self::PartialSuccess)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::TimedOut)
    }
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one module. Immutable once built.
///
/// Failed, timed-out and skipped results never carry tests or coverage, and a
/// successful result never carries an error message.
#[derive(Debug, Clone)]
pub struct ModuleResult {
    descriptor: ModuleDescriptor,
    tests: Vec<TestMethodRecord>,
    coverage: Vec<CoverageRecord>,
    status: ModuleStatus,
    error: Option<String>,
    elapsed: Duration,
}

impl ModuleResult {
    pub const TIMEOUT_MESSAGE: &'static str = "Processing timeout";

    pub fn success(
        descriptor: ModuleDescriptor,
        tests: Vec<TestMethodRecord>,
        coverage: Vec<CoverageRecord>,
        elapsed: Duration,
    ) -> Self {
        Self {
            descriptor,
            tests,
            coverage,
            status: ModuleStatus::Success,
            error: None,
            elapsed,
        }
    }

    pub fn partial(
        descriptor: ModuleDescriptor,
        tests: Vec<TestMethodRecord>,
        coverage: Vec<CoverageRecord>,
        message: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            descriptor,
            tests,
            coverage,
            status: ModuleStatus::PartialSuccess,
            error: Some(message.into()),
            elapsed,
        }
    }

    pub fn failed(descriptor: ModuleDescriptor, message: impl Into<String>, elapsed: Duration) -> Self {
        Self::without_data(descriptor, ModuleStatus::Failed, message.into(), elapsed)
    }

    pub fn timed_out(descriptor: ModuleDescriptor, timeout: Duration) -> Self {
        let message = format!("{} ({}s)", Self::TIMEOUT_MESSAGE, timeout.as_secs());
        Self::without_data(descriptor, ModuleStatus::TimedOut, message, timeout)
    }

    pub fn skipped(descriptor: ModuleDescriptor, message: impl Into<String>) -> Self {
        Self::without_data(descriptor, ModuleStatus::Skipped, message.into(), Duration::ZERO)
    }

    fn without_data(
        descriptor: ModuleDescriptor,
        status: ModuleStatus,
        message: String,
        elapsed: Duration,
    ) -> Self {
        Self {
            descriptor,
            tests: Vec::new(),
            coverage: Vec::new(),
            status,
            error: Some(message),
            elapsed,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    pub fn tests(&self) -> &[TestMethodRecord] {
        &self.tests
    }

    pub fn coverage(&self) -> &[CoverageRecord] {
        &self.coverage
    }

    pub fn status(&self) -> ModuleStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn correlated_count(&self) -> usize {
        self.tests.iter().filter(|t| t.is_correlated()).count()
    }

    /// Tests whose last recorded run failed or errored.
    pub fn failing_test_count(&self) -> usize {
        self.tests
            .iter()
            .filter(|t| t.execution.as_ref().is_some_and(|e| e.status.is_failure()))
            .count()
    }
}
