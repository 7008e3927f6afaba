use crate::core::{MatchStrategy, ModuleStatus};
use std::path::PathBuf;
use std::time::Duration;

/// A checkpoint reached by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    ParseStarted {
        path: PathBuf,
    },
    ParseFinished {
        path: PathBuf,
        records: usize,
    },
    ReportSkipped {
        path: PathBuf,
        reason: String,
    },
    MatchFound {
        test: String,
        strategy: MatchStrategy,
        key: String,
    },
    MatchFailed {
        test: String,
    },
    ModuleStarted {
        module: String,
    },
    ModuleCompleted {
        module: String,
        status: ModuleStatus,
        elapsed: Duration,
    },
}

impl PipelineEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ParseStarted { .. } => "parse-started",
            Self::ParseFinished { .. } => "parse-finished",
            Self::ReportSkipped { .. } => "report-skipped",
            Self::MatchFound { .. } => "match-found",
            Self::MatchFailed { .. } => "match-failed",
            Self::ModuleStarted { .. } => "module-started",
            Self::ModuleCompleted { .. } => "module-completed",
        }
    }
}
