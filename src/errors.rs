//! Error types for each layer.
//!
//! Errors stay local to the layer that can recover from them: a [`ReportError`]
//! never leaves the normalizer, a [`PipelineError`] never leaves its module
//! unit. Only [`OrchestratorError`] and [`ConfigError`] reach the binary.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to read or parse a single coverage report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("coverage report not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("coverage report path is not a file: {}", path.display())]
    NotAFile { path: PathBuf },

    #[error("coverage report is empty: {}", path.display())]
    Empty { path: PathBuf },

    #[error("coverage report {} is {size} bytes, limit is {limit}", path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("HTML coverage report skipped, use the XML report instead: {}", path.display())]
    Html { path: PathBuf },

    #[error("unsupported coverage report format: {}", path.display())]
    Unsupported { path: PathBuf },

    #[error("failed to read coverage report {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed coverage report {} at byte {position}: {message}", path.display())]
    Malformed {
        path: PathBuf,
        position: u64,
        message: String,
    },
}

impl ReportError {
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path }
            | Self::NotAFile { path }
            | Self::Empty { path }
            | Self::TooLarge { path, .. }
            | Self::Html { path }
            | Self::Unsupported { path }
            | Self::Io { path, .. }
            | Self::Malformed { path, .. } => path,
        }
    }

    /// Skips that reflect a deliberate choice rather than a broken report.
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::Html { .. })
    }
}

/// Failure to read or parse one Surefire test-run report.
#[derive(Debug, Error)]
pub enum ExecutionReportError {
    #[error("failed to read test report {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("test report {} is {size} bytes, limit is {limit}", path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("malformed test report {} at byte {position}: {message}", path.display())]
    Malformed {
        path: PathBuf,
        position: u64,
        message: String,
    },

    #[error("no <testsuite> element in {}", path.display())]
    NoSuite { path: PathBuf },
}

/// Call-level misuse of the normalizer.
#[derive(Debug, Error)]
pub enum CoverageError {
    #[error("none of the {count} coverage path(s) is a file (first: {})", first.display())]
    NoReadableReports { count: usize, first: PathBuf },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid config value for `{field}`: {message}")]
    Invalid { field: &'static str, message: String },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Failure to enumerate the modules of a project.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("project manifest not found: {}", path.display())]
    ManifestMissing { path: PathBuf },

    #[error("failed to read project manifest {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed project manifest {}: {message}", path.display())]
    Manifest { path: PathBuf, message: String },
}

/// Failure to extract test methods from one source file.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("failed to read test source {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no class declaration found in {}", path.display())]
    NoClass { path: PathBuf },
}

/// Failure that aborts one module unit.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Coverage(#[from] CoverageError),

    #[error("test directory {} is not readable: {source}", path.display())]
    TestDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(String),
}

/// Failures fatal to a whole orchestrated run.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("cannot create results directory {}: {source}", path.display())]
    ResultsDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
