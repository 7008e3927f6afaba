//! `.testmap.toml` configuration.
//!
//! Every section and field is optional; missing values fall back to the
//! defaults below. Command-line flags are layered on top with
//! [`ConfigOverrides`].
//!
//! ```toml
//! [coverage]
//! allowed_packages = ["com.example"]
//!
//! [correlation]
//! method_only_fallback = false
//!
//! [orchestrator]
//! max_concurrency = 4
//! module_timeout_secs = 600
//! ```

pub mod coverage;
pub mod loader;
pub mod orchestrator;
pub mod scan;

pub use coverage::CoverageConfig;
pub use loader::{
    directory_ancestors, find_config_file, load_config, load_config_from_dir,
    load_config_from_path, parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use orchestrator::OrchestratorConfig;
pub use scan::ScanConfig;

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

fn default_method_only_fallback() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrelationConfig {
    /// Match on method name alone when no class-qualified key hits.
    ///
    /// Can attribute a test to an unrelated class that happens to share a
    /// method name.
    #[serde(default = "default_method_only_fallback")]
    pub method_only_fallback: bool,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            method_only_fallback: default_method_only_fallback(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TestmapConfig {
    #[serde(default)]
    pub coverage: CoverageConfig,
    #[serde(default)]
    pub correlation: CorrelationConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

impl TestmapConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.coverage.source_extension.trim().is_empty() {
            return Err(invalid("coverage.source_extension", "must not be empty"));
        }
        if self.coverage.max_report_bytes == 0 {
            return Err(invalid("coverage.max_report_bytes", "must be greater than 0"));
        }
        if self.coverage.report_patterns.is_empty() {
            return Err(invalid("coverage.report_patterns", "must name at least one pattern"));
        }
        if let Some(pattern) = self
            .coverage
            .report_patterns
            .iter()
            .find(|p| glob::Pattern::new(p).is_err())
        {
            return Err(invalid(
                "coverage.report_patterns",
                format!("`{pattern}` is not a valid glob"),
            ));
        }
        if self.orchestrator.max_concurrency == Some(0) {
            return Err(invalid("orchestrator.max_concurrency", "must be greater than 0"));
        }
        if self.orchestrator.module_timeout_secs == 0 {
            return Err(invalid("orchestrator.module_timeout_secs", "must be greater than 0"));
        }
        if self.scan.max_source_bytes == 0 {
            return Err(invalid("scan.max_source_bytes", "must be greater than 0"));
        }
        Ok(())
    }

    /// Apply command-line overrides and re-validate.
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(jobs) = overrides.jobs {
            self.orchestrator.max_concurrency = Some(jobs);
        }
        if let Some(secs) = overrides.timeout_secs {
            self.orchestrator.module_timeout_secs = secs;
        }
        if let Some(packages) = &overrides.packages {
            self.coverage.allowed_packages = Some(packages.clone());
        }
        if overrides.no_method_fallback {
            self.correlation.method_only_fallback = false;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Values given on the command line, which win over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub jobs: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub packages: Option<Vec<String>>,
    pub no_method_fallback: bool,
}

fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: message.into(),
    }
}
