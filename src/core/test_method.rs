//! Per-test-method record and its correlation outputs.

use super::coverage::CoverageRecord;
use super::execution::TestExecution;
use super::status::CoverageStatus;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Which lookup produced a correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStrategy {
    /// `package.Class.method`
    FullKey,
    /// `Class.method`
    ShortKey,
    /// `method` alone, regardless of class.
    MethodOnly,
}

impl MatchStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullKey => "full-key",
            Self::ShortKey => "short-key",
            Self::MethodOnly => "method-only",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchInfo {
    pub strategy: MatchStrategy,
    /// Index key that produced the hit.
    pub key: String,
}

/// One test method found in a test source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestMethodRecord {
    pub class_name: String,
    pub method_name: String,
    pub package_name: String,
    pub source_path: PathBuf,
    /// Free-text tags scraped from doc comments (module, purpose, ...).
    pub annotations: BTreeMap<String, String>,
    pub coverage_percent: f64,
    pub branches_covered: u32,
    pub branches_total: u32,
    pub coverage_status: CoverageStatus,
    pub matched: Option<MatchInfo>,
    /// Outcome in the last recorded test run, when a report mentions it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution: Option<TestExecution>,
}

impl TestMethodRecord {
    pub fn new(
        package_name: impl Into<String>,
        class_name: impl Into<String>,
        method_name: impl Into<String>,
        source_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            package_name: package_name.into(),
            source_path: source_path.into(),
            annotations: BTreeMap::new(),
            coverage_percent: 0.0,
            branches_covered: 0,
            branches_total: 0,
            coverage_status: CoverageStatus::Unknown,
            matched: None,
            execution: None,
        }
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// `package.Class`, or just `Class` when the package is unknown.
    pub fn qualified_class_name(&self) -> String {
        if self.package_name.is_empty() {
            self.class_name.clone()
        } else {
            format!("{}.{}", self.package_name, self.class_name)
        }
    }

    /// `package.Class#method`, used in logs and events.
    pub fn display_name(&self) -> String {
        format!("{}#{}", self.qualified_class_name(), self.method_name)
    }

    pub fn is_correlated(&self) -> bool {
        self.matched.is_some()
    }

    /// Return the correlation outputs to their uncorrelated defaults.
    pub fn reset_correlation(&mut self) {
        self.coverage_percent = 0.0;
        self.branches_covered = 0;
        self.branches_total = 0;
        self.coverage_status = CoverageStatus::Unknown;
        self.matched = None;
    }

    /// Copy the branch coverage of `record` onto this test.
    ///
    /// When the record has no branches the label falls back to the record's
    /// best measured dimension, since zero branches is "not measured".
    pub fn apply_match(&mut self, record: &CoverageRecord, info: MatchInfo) {
        self.coverage_percent = record.branch_coverage();
        self.branches_covered = record.branches.covered();
        self.branches_total = record.branches.total();
        self.coverage_status = if record.branches.is_measured() {
            CoverageStatus::from_percentage(self.coverage_percent)
        } else {
            record.status()
        };
        self.matched = Some(info);
    }
}
