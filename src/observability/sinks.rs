use super::events::PipelineEvent;
use parking_lot::Mutex;

/// Receiver of pipeline events.
///
/// Called concurrently from worker threads, so implementations must be cheap
/// and must not block for long.
pub trait EventSink: Send + Sync + 'static {
    fn record(&self, event: &PipelineEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::ParseStarted { path } => {
                tracing::debug!(path = %path.display(), "parsing coverage report");
            }
            PipelineEvent::ParseFinished { path, records } => {
                tracing::debug!(path = %path.display(), records, "parsed coverage report");
            }
            PipelineEvent::ReportSkipped { path, reason } => {
                tracing::warn!(path = %path.display(), "skipping coverage report: {}", reason);
            }
            PipelineEvent::MatchFound {
                test,
                strategy,
                key,
            } => {
                tracing::trace!(%test, %strategy, %key, "correlated test");
            }
            PipelineEvent::MatchFailed { test } => {
                tracing::trace!(%test, "no coverage match");
            }
            PipelineEvent::ModuleStarted { module } => {
                tracing::info!(%module, "processing module");
            }
            PipelineEvent::ModuleCompleted {
                module,
                status,
                elapsed,
            } => {
                tracing::info!(
                    %module,
                    %status,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "module finished"
                );
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: &PipelineEvent) {}
}

/// Keeps every event, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<PipelineEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events.lock().iter().filter(|e| e.name() == name).count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: &PipelineEvent) {
        self.events.lock().push(event.clone());
    }
}
