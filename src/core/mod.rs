//! Core data model shared by every layer.
//!
//! - [`CoverageRecord`] is the canonical per-method coverage entity produced by
//!   the normalizer and never mutated afterwards.
//! - [`TestMethodRecord`] is the per-test entity whose correlation fields are
//!   written exactly once by the correlation engine.
//! - [`TestExecution`] is a test's recorded outcome from an earlier test run,
//!   attached after correlation.
//! - [`ModuleDescriptor`] and [`ModuleResult`] describe one module going
//!   through the orchestrator.

pub mod coverage;
pub mod execution;
pub mod module;
pub mod status;
pub mod test_method;

pub use coverage::{CoverageCounter, CoverageRecord};
pub use execution::{ExecutionStatus, TestExecution};
pub use module::{ModuleDescriptor, ModuleResult, ModuleStatus};
pub use status::CoverageStatus;
pub use test_method::{MatchInfo, MatchStrategy, TestMethodRecord};
