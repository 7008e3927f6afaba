//! Recorded test outcomes, read from existing test-run reports.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Passed,
    Failed,
    Error,
    Skipped,
}

impl ExecutionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Error => "error",
            Self::Skipped => "skipped",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Error)
    }

    /// Ordering used when one method ran several times (parameterized tests):
    /// error, then failed, then passed, then skipped.
    fn severity(&self) -> u8 {
        match self {
            Self::Skipped => 0,
            Self::Passed => 1,
            Self::Failed => 2,
            Self::Error => 3,
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one test method in the last recorded run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestExecution {
    pub status: ExecutionStatus,
    pub time_secs: f64,
    /// Number of recorded invocations folded into this outcome.
    pub invocations: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl TestExecution {
    pub fn new(status: ExecutionStatus, time_secs: f64) -> Self {
        Self {
            status,
            time_secs,
            invocations: 1,
            message: None,
            error_type: None,
        }
    }

    /// Fold another invocation of the same method into this outcome.
    ///
    /// Times add up; the most severe status wins and brings its message.
    pub fn absorb(&mut self, other: &TestExecution) {
        self.time_secs += other.time_secs;
        self.invocations += other.invocations;
        if other.status.severity() > self.status.severity() {
            self.status = other.status;
            self.message = other.message.clone();
            self.error_type = other.error_type.clone();
        }
    }
}
