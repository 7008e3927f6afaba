use crate::core::module::{DEFAULT_COVERAGE_DIR, DEFAULT_EXECUTION_DIR, DEFAULT_TEST_DIR};
use serde::{Deserialize, Serialize};

fn default_excluded_dirs() -> Vec<String> {
    [".git", ".svn", "node_modules", "target", "build", "out", ".idea", ".vscode"]
        .iter()
        .map(|d| d.to_string())
        .collect()
}

/// 10 MiB
fn default_max_source_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_test_source_dir() -> String {
    DEFAULT_TEST_DIR.to_string()
}

fn default_coverage_dir() -> String {
    DEFAULT_COVERAGE_DIR.to_string()
}

fn default_execution_dir() -> String {
    DEFAULT_EXECUTION_DIR.to_string()
}

fn default_execution_patterns() -> Vec<String> {
    vec!["TEST-*.xml".to_string()]
}

/// Directory walking and module layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    /// Directory names never descended into when looking for test sources.
    #[serde(default = "default_excluded_dirs")]
    pub excluded_dirs: Vec<String>,

    /// Test sources larger than this are skipped.
    #[serde(default = "default_max_source_bytes")]
    pub max_source_bytes: u64,

    /// Test source root, relative to each module.
    #[serde(default = "default_test_source_dir")]
    pub test_source_dir: String,

    /// Coverage report directory, relative to each module.
    #[serde(default = "default_coverage_dir")]
    pub coverage_dir: String,

    /// Surefire report directory, relative to each module.
    #[serde(default = "default_execution_dir")]
    pub execution_dir: String,

    /// File name globs of test-run reports.
    #[serde(default = "default_execution_patterns")]
    pub execution_patterns: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            excluded_dirs: default_excluded_dirs(),
            max_source_bytes: default_max_source_bytes(),
            test_source_dir: default_test_source_dir(),
            coverage_dir: default_coverage_dir(),
            execution_dir: default_execution_dir(),
            execution_patterns: default_execution_patterns(),
        }
    }
}

impl ScanConfig {
    /// Excluded directories for report discovery; reports live under `target`.
    pub fn coverage_excluded_dirs(&self) -> Vec<String> {
        self.excluded_dirs
            .iter()
            .filter(|d| d.as_str() != "target")
            .cloned()
            .collect()
    }
}
