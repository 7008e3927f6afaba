//! Structured pipeline events and the sinks that receive them.
//!
//! The normalizer, correlation engine and orchestrator report progress by
//! calling [`EventSink::record`] at fixed checkpoints. Behaviour never depends
//! on which sink is attached:
//!
//! - [`TracingSink`] forwards every event to `tracing` (the default)
//! - [`NullSink`] drops everything
//! - [`MemorySink`] keeps events in memory for inspection
//!
//! The CLI additionally wraps a sink in
//! [`ProgressBarSink`](crate::progress::ProgressBarSink).

pub mod events;
pub mod logging;
pub mod sinks;

pub use events::PipelineEvent;
pub use logging::{init_logging, level_for_verbosity, LOG_ENV_VAR};
pub use sinks::{EventSink, MemorySink, NullSink, TracingSink};

use std::sync::Arc;

/// Shared default sink.
pub fn default_sink() -> Arc<dyn EventSink> {
    Arc::new(TracingSink)
}
