use serde::{Deserialize, Serialize};

fn default_internal_packages() -> Vec<String> {
    vec!["com.testmap".to_string()]
}

fn default_source_extension() -> String {
    "java".to_string()
}

/// 100 MiB
fn default_max_report_bytes() -> u64 {
    100 * 1024 * 1024
}

fn default_report_patterns() -> Vec<String> {
    vec!["jacoco*.xml".to_string(), "*coverage*.xml".to_string()]
}

/// Coverage report discovery and normalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverageConfig {
    /// Package prefixes to keep. When unset every package is kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_packages: Option<Vec<String>>,

    /// Packages that are always dropped, whatever the allow-list says.
    #[serde(default = "default_internal_packages")]
    pub internal_packages: Vec<String>,

    /// Extension used to infer a missing source file name.
    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    /// Reports larger than this are skipped.
    #[serde(default = "default_max_report_bytes")]
    pub max_report_bytes: u64,

    /// Case-insensitive file name globs identifying coverage reports.
    #[serde(default = "default_report_patterns")]
    pub report_patterns: Vec<String>,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            allowed_packages: None,
            internal_packages: default_internal_packages(),
            source_extension: default_source_extension(),
            max_report_bytes: default_max_report_bytes(),
            report_patterns: default_report_patterns(),
        }
    }
}
