//! Test-to-implementation correlation.
//!
//! - [`candidates`] - pure name guessing, in priority order
//! - [`index`] - per-module lookup tables over coverage records
//! - [`engine`] - strategy ordering and write-back onto test records

pub mod candidates;
pub mod engine;
pub mod index;

pub use candidates::{class_candidates, method_candidates};
pub use engine::{find_match, CorrelationEngine, CorrelationReport};
pub use index::{CoverageIndex, CoverageIndexStats};
