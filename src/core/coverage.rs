//! Canonical per-method coverage record.

use super::status::CoverageStatus;
use serde::Serialize;

/// A `(covered, total)` pair for one coverage dimension.
///
/// `total == 0` means the dimension was not measured, not that it is uncovered.
/// `covered <= total` always holds; impossible input is clamped on construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CoverageCounter {
    covered: u32,
    total: u32,
}

impl CoverageCounter {
    /// Build a counter, clamping `covered` to zero when it exceeds `total`.
    pub fn new(covered: u32, total: u32) -> Self {
        if covered > total {
            Self { covered: 0, total }
        } else {
            Self { covered, total }
        }
    }

    /// Build a counter from JaCoCo's `covered`/`missed` attributes.
    pub fn from_missed(covered: u32, missed: u32) -> Self {
        Self::new(covered, covered.saturating_add(missed))
    }

    pub fn covered(&self) -> u32 {
        self.covered
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn missed(&self) -> u32 {
        self.total - self.covered
    }

    pub fn is_measured(&self) -> bool {
        self.total > 0
    }

    /// Percentage in `[0, 100]`; `0.0` when the dimension was not measured.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.covered) / f64::from(self.total) * 100.0
        }
    }
}

/// Coverage of one implementation method, as read from a coverage report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageRecord {
    pub class_name: String,
    pub method_name: String,
    /// Dotted package name, empty when the report did not name one.
    pub package_name: String,
    pub source_file: String,
    pub line: Option<u32>,
    pub instructions: CoverageCounter,
    pub branches: CoverageCounter,
    pub lines: CoverageCounter,
    pub methods: CoverageCounter,
}

impl CoverageRecord {
    pub fn new(
        package_name: impl Into<String>,
        class_name: impl Into<String>,
        method_name: impl Into<String>,
        source_file: impl Into<String>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            package_name: package_name.into(),
            source_file: source_file.into(),
            line: None,
            instructions: CoverageCounter::default(),
            branches: CoverageCounter::default(),
            lines: CoverageCounter::default(),
            methods: CoverageCounter::default(),
        }
    }

    /// `package.Class`, or just `Class` when the package is unknown.
    pub fn full_class_name(&self) -> String {
        if self.package_name.is_empty() {
            self.class_name.clone()
        } else {
            format!("{}.{}", self.package_name, self.class_name)
        }
    }

    /// `package.Class.method`
    pub fn full_key(&self) -> String {
        format!("{}.{}", self.full_class_name(), self.method_name)
    }

    /// `Class.method`
    pub fn short_key(&self) -> String {
        format!("{}.{}", self.class_name, self.method_name)
    }

    pub fn instruction_coverage(&self) -> f64 {
        self.instructions.percentage()
    }

    pub fn branch_coverage(&self) -> f64 {
        self.branches.percentage()
    }

    pub fn line_coverage(&self) -> f64 {
        self.lines.percentage()
    }

    pub fn method_coverage(&self) -> f64 {
        self.methods.percentage()
    }

    /// Branch coverage is the metric used for correlation and reporting.
    pub fn primary_coverage(&self) -> f64 {
        self.branch_coverage()
    }

    /// Best of branch, instruction and line coverage.
    pub fn best_coverage(&self) -> f64 {
        self.branch_coverage()
            .max(self.instruction_coverage())
            .max(self.line_coverage())
    }

    pub fn status(&self) -> CoverageStatus {
        CoverageStatus::from_percentage(self.best_coverage())
    }

    /// Method name as shown to readers. Static initializers get a readable form.
    pub fn display_method_name(&self) -> &str {
        match self.method_name.as_str() {
            "<clinit>" => "static {...}",
            name => name,
        }
    }
}
