//! Coverage report normalization.
//!
//! Turns JaCoCo XML reports into [`CoverageRecord`]s, one per implementation
//! method. Each report is handled independently: a missing, empty, oversized
//! or malformed report is logged and skipped, never fatal to the batch.
//!
//! ```text
//!   types.rs ──► handlers.rs (pure) ──► parser.rs (file I/O) ──► mod.rs
//!                                         filter.rs ─┘   stats.rs
//! ```

pub mod filter;
pub mod handlers;
pub mod parser;
pub mod stats;
pub mod types;

pub use filter::PackageFilter;
pub use handlers::{UNKNOWN_CLASS, UNKNOWN_METHOD};
pub use parser::{parse_report, parse_report_str};
pub use stats::CoverageSummary;
pub use types::{CounterKind, NormalizeOutcome, ReportFormat};

use crate::config::CoverageConfig;
use crate::core::CoverageRecord;
use crate::errors::CoverageError;
use crate::observability::{default_sink, EventSink, PipelineEvent};
use std::path::PathBuf;
use std::sync::Arc;

pub struct CoverageNormalizer {
    config: CoverageConfig,
    filter: PackageFilter,
    sink: Arc<dyn EventSink>,
}

impl CoverageNormalizer {
    pub fn new(config: CoverageConfig) -> Self {
        Self {
            filter: PackageFilter::from_config(&config),
            config,
            sink: default_sink(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Normalize every report in `paths`, skipping the ones that fail.
    ///
    /// # Errors
    ///
    /// Only when `paths` is non-empty and none of them is a regular file,
    /// which means the caller passed directories instead of reports.
    pub fn normalize(&self, paths: &[PathBuf]) -> Result<Vec<CoverageRecord>, CoverageError> {
        self.normalize_detailed(paths).map(|outcome| outcome.records)
    }

    /// Like [`normalize`](Self::normalize), also returning the per-file failures.
    pub fn normalize_detailed(&self, paths: &[PathBuf]) -> Result<NormalizeOutcome, CoverageError> {
        if let Some(first) = paths.first() {
            if paths.iter().all(|p| p.is_dir()) {
                return Err(CoverageError::NoReadableReports {
                    count: paths.len(),
                    first: first.clone(),
                });
            }
        }

        let mut outcome = NormalizeOutcome::default();
        for path in paths {
            self.sink.record(&PipelineEvent::ParseStarted { path: path.clone() });
            match parse_report(path, &self.config) {
                Ok(records) => {
                    let parsed = records.len();
                    let kept = self.filter.apply(records);
                    tracing::debug!(
                        "{}: {} method records, {} after package filter",
                        path.display(),
                        parsed,
                        kept.len()
                    );
                    self.sink.record(&PipelineEvent::ParseFinished {
                        path: path.clone(),
                        records: kept.len(),
                    });
                    outcome.parsed_reports += 1;
                    outcome.records.extend(kept);
                }
                Err(e) => {
                    self.sink.record(&PipelineEvent::ReportSkipped {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                    outcome.failures.push(e);
                }
            }
        }
        Ok(outcome)
    }
}

impl Default for CoverageNormalizer {
    fn default() -> Self {
        Self::new(CoverageConfig::default())
    }
}
