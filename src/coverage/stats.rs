use crate::core::CoverageRecord;
use serde::Serialize;

/// Branch coverage at or above this counts as high.
pub const HIGH_COVERAGE_THRESHOLD: f64 = 80.0;

/// Aggregate figures over a set of coverage records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoverageSummary {
    pub total_entries: usize,
    pub average_branch_coverage: f64,
    pub high_coverage_count: usize,
}

impl CoverageSummary {
    pub fn from_records(records: &[CoverageRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }
        let total: f64 = records.iter().map(CoverageRecord::branch_coverage).sum();
        Self {
            total_entries: records.len(),
            average_branch_coverage: total / records.len() as f64,
            high_coverage_count: records
                .iter()
                .filter(|r| r.branch_coverage() >= HIGH_COVERAGE_THRESHOLD)
                .count(),
        }
    }
}
