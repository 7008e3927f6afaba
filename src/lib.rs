// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod correlation;
pub mod coverage;
pub mod errors;
pub mod inventory;
pub mod io;
pub mod modules;
pub mod observability;
pub mod orchestrator;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod surefire;

// Re-export commonly used types
pub use crate::core::{
    CoverageCounter, CoverageRecord, CoverageStatus, ExecutionStatus, MatchInfo, MatchStrategy,
    ModuleDescriptor, ModuleResult, ModuleStatus, TestExecution, TestMethodRecord,
};

pub use crate::config::{load_config, TestmapConfig};
pub use crate::correlation::{CorrelationEngine, CorrelationReport};
pub use crate::coverage::CoverageNormalizer;
pub use crate::errors::{
    ConfigError, CoverageError, DiscoveryError, ExecutionReportError, InventoryError,
    OrchestratorError, PipelineError, ReportError,
};
pub use crate::modules::discover_modules;
pub use crate::orchestrator::{AggregateView, Orchestrator, RunReport};
pub use crate::pipeline::{ModuleOutput, ModulePipeline, ModuleProcessor};
