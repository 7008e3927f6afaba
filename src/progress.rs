//! Module-level progress bar for the CLI.
//!
//! Hidden when stderr is not a terminal or `TESTMAP_QUIET` is set.

use crate::observability::{EventSink, PipelineEvent};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::sync::Arc;

pub const TEMPLATE_MODULES: &str = "{spinner} [{elapsed_precise}] {bar:30} {pos}/{len} modules {msg}";
pub const QUIET_ENV_VAR: &str = "TESTMAP_QUIET";

pub fn should_show_progress() -> bool {
    std::env::var_os(QUIET_ENV_VAR).is_none() && std::io::stderr().is_terminal()
}

/// Advances a bar once per finished module and forwards every event to the
/// wrapped sink.
pub struct ProgressBarSink {
    bar: ProgressBar,
    inner: Arc<dyn EventSink>,
}

impl ProgressBarSink {
    pub fn new(total_modules: usize, inner: Arc<dyn EventSink>) -> Self {
        let bar = if should_show_progress() {
            ProgressBar::new(total_modules as u64)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE_MODULES) {
            bar.set_style(style);
        }
        Self { bar, inner }
    }

    pub fn hidden(inner: Arc<dyn EventSink>) -> Self {
        Self {
            bar: ProgressBar::hidden(),
            inner,
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl EventSink for ProgressBarSink {
    fn record(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::ModuleStarted { module } => self.bar.set_message(module.clone()),
            PipelineEvent::ModuleCompleted { .. } => self.bar.inc(1),
            _ => {}
        }
        self.inner.record(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ModuleStatus;
    use crate::observability::MemorySink;
    use std::time::Duration;

    #[test]
    fn test_counts_completed_modules_and_forwards() {
        let inner = Arc::new(MemorySink::new());
        let sink = ProgressBarSink::hidden(inner.clone());

        sink.record(&PipelineEvent::ModuleStarted { module: "a".into() });
        sink.record(&PipelineEvent::ModuleCompleted {
            module: "a".into(),
            status: ModuleStatus::Success,
            elapsed: Duration::ZERO,
        });

        assert_eq!(sink.position(), 1);
        assert_eq!(inner.events().len(), 2);
        sink.finish();
    }
}
