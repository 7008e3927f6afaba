//! Report-level types for the coverage normalizer.

use crate::core::CoverageRecord;
use crate::errors::ReportError;
use std::path::Path;

/// Report format, decided from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Xml,
    /// Recognised but not parsed.
    Html,
    Unsupported,
}

impl ReportFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xml" => Self::Xml,
            "html" | "htm" => Self::Html,
            _ => Self::Unsupported,
        }
    }
}

/// JaCoCo counter types. Anything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    Instruction,
    Branch,
    Line,
    Method,
}

impl CounterKind {
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "INSTRUCTION" => Some(Self::Instruction),
            "BRANCH" => Some(Self::Branch),
            "LINE" => Some(Self::Line),
            "METHOD" => Some(Self::Method),
            _ => None,
        }
    }
}

/// Result of normalizing a batch of reports, including what was skipped.
#[derive(Debug, Default)]
pub struct NormalizeOutcome {
    pub records: Vec<CoverageRecord>,
    pub failures: Vec<ReportError>,
    /// Reports that parsed, whether or not they produced records.
    pub parsed_reports: usize,
}

impl NormalizeOutcome {
    /// Failures worth surfacing to the user.
    pub fn problems(&self) -> impl Iterator<Item = &ReportError> {
        self.failures.iter().filter(|f| !f.is_benign())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ReportFormat::from_path(Path::new("jacoco.xml")), ReportFormat::Xml);
        assert_eq!(ReportFormat::from_path(Path::new("JACOCO.XML")), ReportFormat::Xml);
        assert_eq!(ReportFormat::from_path(Path::new("index.html")), ReportFormat::Html);
        assert_eq!(ReportFormat::from_path(Path::new("jacoco.csv")), ReportFormat::Unsupported);
        assert_eq!(ReportFormat::from_path(Path::new("report")), ReportFormat::Unsupported);
    }

    #[test]
    fn test_counter_kind() {
        assert_eq!(CounterKind::parse("BRANCH"), Some(CounterKind::Branch));
        assert_eq!(CounterKind::parse("COMPLEXITY"), None);
        assert_eq!(CounterKind::parse("branch"), None);
    }
}
