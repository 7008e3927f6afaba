//! Worker pool and deadline settings for multi-module runs.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Never run with fewer workers than this, even on a single core.
pub const MIN_WORKERS: usize = 2;

/// 30 minutes
fn default_module_timeout_secs() -> u64 {
    30 * 60
}

fn default_shutdown_grace_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrchestratorConfig {
    /// Worker count (default: CPU count, at least 2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,

    /// Per-module deadline, measured from submission.
    #[serde(default = "default_module_timeout_secs")]
    pub module_timeout_secs: u64,

    /// How long shutdown waits for in-flight modules.
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: None,
            module_timeout_secs: default_module_timeout_secs(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
        }
    }
}

impl OrchestratorConfig {
    /// Configured worker count, or the number of CPUs, never below [`MIN_WORKERS`].
    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrency
            .unwrap_or_else(num_cpus::get)
            .max(MIN_WORKERS)
    }

    pub fn module_timeout(&self) -> Duration {
        Duration::from_secs(self.module_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}
