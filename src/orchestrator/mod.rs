//! Concurrent multi-module orchestration.
//!
//! Every valid module becomes one unit of work on a fixed-size pool. Units
//! report back on one shared channel, tagged with their input index, and the
//! collector records each result as it arrives. A unit still pending at its
//! deadline, measured from submission, is recorded as timed out and left to
//! finish on its own; whatever it sends later is dropped.
//!
//! ```text
//! descriptors ─┬─ invalid ──────────────────────────────► Skipped
//!              └─ valid ─► pool ─► (index, result) ─► collector ─┬─► result
//!                                                                └─► TimedOut
//! ```

pub mod aggregate;
pub mod pool;

pub use aggregate::{AggregateView, ModuleScoped};
pub use pool::{panic_message, WorkerPool};

use crate::config::OrchestratorConfig;
use crate::core::{ModuleDescriptor, ModuleResult, ModuleStatus};
use crate::errors::OrchestratorError;
use crate::observability::{EventSink, PipelineEvent};
use crate::output;
use crate::pipeline::ModuleProcessor;
use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use std::collections::HashMap;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// One entry per input module, in input order.
    pub results: Vec<ModuleResult>,
    pub aggregate: AggregateView,
    pub elapsed: Duration,
    /// Report files that were written successfully.
    pub written: Vec<PathBuf>,
}

impl RunReport {
    fn count(&self, pred: impl Fn(ModuleStatus) -> bool) -> usize {
        self.results.iter().filter(|r| pred(r.status())).count()
    }

    pub fn successful(&self) -> usize {
        self.count(|s| s.has_data())
    }

    pub fn failed(&self) -> usize {
        self.count(|s| s.is_failure())
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| s == ModuleStatus::Skipped)
    }

    pub fn total_tests(&self) -> usize {
        self.results.iter().map(|r| r.tests().len()).sum()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Results ordered by module name.
    pub fn sorted_by_name(&self) -> Vec<&ModuleResult> {
        let mut sorted: Vec<_> = self.results.iter().collect();
        sorted.sort_by(|a, b| a.name().cmp(b.name()));
        sorted
    }
}

/// A submitted unit the collector has not heard from yet.
struct Pending {
    descriptor: ModuleDescriptor,
    deadline: Instant,
}

type Delivery = (usize, ModuleResult);

pub struct Orchestrator {
    config: OrchestratorConfig,
    processor: Arc<dyn ModuleProcessor>,
    sink: Arc<dyn EventSink>,
    pool: WorkerPool,
}

impl Orchestrator {
    /// # Errors
    ///
    /// Fails only if the worker pool cannot be started.
    pub fn new(
        config: OrchestratorConfig,
        processor: Arc<dyn ModuleProcessor>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, OrchestratorError> {
        let pool = WorkerPool::new(config.effective_concurrency())?;
        tracing::debug!("worker pool started with {} threads", pool.size());
        Ok(Self {
            config,
            processor,
            sink,
            pool,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.pool.size()
    }

    /// Process every module and write the reports into `results_dir`.
    ///
    /// # Errors
    ///
    /// Only when `results_dir` cannot be created. Module failures, timeouts and
    /// report write failures are recorded, never returned.
    pub fn run(&self, modules: Vec<ModuleDescriptor>, results_dir: &Path) -> Result<RunReport, OrchestratorError> {
        fs::create_dir_all(results_dir).map_err(|source| OrchestratorError::ResultsDir {
            path: results_dir.to_path_buf(),
            source,
        })?;

        let started = Instant::now();
        let results = self.collect(modules);
        let aggregate = AggregateView::from_results(&results);
        let written = output::write_reports(&results, &aggregate, results_dir);

        let report = RunReport {
            results,
            aggregate,
            elapsed: started.elapsed(),
            written,
        };
        tracing::info!(
            "processed {} modules in {:?}: {} ok, {} failed, {} skipped",
            report.results.len(),
            report.elapsed,
            report.successful(),
            report.failed(),
            report.skipped()
        );
        Ok(report)
    }

    /// Process every module and return one result per module, in input order.
    ///
    /// `ModuleCompleted` is emitted as each module finishes, in completion
    /// order.
    pub fn collect(&self, modules: Vec<ModuleDescriptor>) -> Vec<ModuleResult> {
        let timeout = self.config.module_timeout();
        let (sender, receiver) = channel::unbounded::<Delivery>();
        let mut results: Vec<Option<ModuleResult>> = (0..modules.len()).map(|_| None).collect();
        let mut pending: HashMap<usize, Pending> = HashMap::new();

        for (index, descriptor) in modules.into_iter().enumerate() {
            match descriptor.validation_error.clone() {
                Some(reason) => {
                    tracing::warn!("skipping module {}: {}", descriptor.name, reason);
                    self.complete(&mut results, index, ModuleResult::skipped(descriptor, reason));
                }
                None => {
                    let deadline = self.submit(index, descriptor.clone(), timeout, sender.clone());
                    pending.insert(index, Pending { descriptor, deadline });
                }
            }
        }
        // Workers hold the remaining senders; disconnection means all of them exited.
        drop(sender);

        self.await_pending(&receiver, &mut pending, &mut results, timeout);
        results.into_iter().flatten().collect()
    }

    fn submit(&self, index: usize, descriptor: ModuleDescriptor, timeout: Duration, sender: Sender<Delivery>) -> Instant {
        let processor = Arc::clone(&self.processor);
        let sink = Arc::clone(&self.sink);
        let deadline = Instant::now() + timeout;

        self.pool.submit(move || {
            let result = run_unit(processor.as_ref(), &descriptor, sink.as_ref());
            if sender.send((index, result)).is_err() {
                tracing::debug!("result for {} arrived after collection ended, dropped", descriptor.name);
            }
        });
        deadline
    }

    /// Receive results until nothing is pending, expiring units at their deadline.
    fn await_pending(
        &self,
        receiver: &Receiver<Delivery>,
        pending: &mut HashMap<usize, Pending>,
        results: &mut [Option<ModuleResult>],
        timeout: Duration,
    ) {
        while let Some(next_deadline) = pending.values().map(|p| p.deadline).min() {
            match receiver.recv_deadline(next_deadline) {
                Ok((index, result)) => {
                    if pending.remove(&index).is_some() {
                        self.complete(results, index, result);
                    } else {
                        tracing::debug!("late result for {} dropped", result.name());
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    let now = Instant::now();
                    let expired: Vec<usize> = pending
                        .iter()
                        .filter(|(_, p)| p.deadline <= now)
                        .map(|(index, _)| *index)
                        .collect();
                    for index in expired {
                        if let Some(unit) = pending.remove(&index) {
                            tracing::error!("module {} timed out after {:?}", unit.descriptor.name, timeout);
                            self.complete(results, index, ModuleResult::timed_out(unit.descriptor, timeout));
                        }
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    for (index, unit) in pending.drain() {
                        tracing::error!("module {} worker exited without a result", unit.descriptor.name);
                        let result = ModuleResult::failed(
                            unit.descriptor,
                            "Processing error: worker exited without a result",
                            Duration::ZERO,
                        );
                        self.complete(results, index, result);
                    }
                }
            }
        }
    }

    fn complete(&self, results: &mut [Option<ModuleResult>], index: usize, result: ModuleResult) {
        self.sink.record(&PipelineEvent::ModuleCompleted {
            module: result.name().to_string(),
            status: result.status(),
            elapsed: result.elapsed(),
        });
        results[index] = Some(result);
    }

    /// Wait up to `grace` for in-flight units. Returns whether all finished.
    pub fn drain(&self, grace: Duration) -> bool {
        let drained = self.pool.drain(grace);
        if !drained {
            tracing::warn!(
                "{} module(s) still running after {:?}, abandoning them",
                self.pool.in_flight(),
                grace
            );
        }
        drained
    }

    /// Drain for the configured grace period, then release the pool.
    pub fn shutdown(self) -> bool {
        self.drain(self.config.shutdown_grace())
    }
}

/// Run one module, converting every error and panic into a result.
fn run_unit(processor: &dyn ModuleProcessor, module: &ModuleDescriptor, sink: &dyn EventSink) -> ModuleResult {
    let span = tracing::info_span!("module", name = %module.name);
    let _enter = span.enter();

    sink.record(&PipelineEvent::ModuleStarted {
        module: module.name.clone(),
    });
    let started = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| processor.process(module)));
    let elapsed = started.elapsed();

    match outcome {
        Ok(Ok(output)) => output.into_result(module.clone(), elapsed),
        Ok(Err(e)) => {
            tracing::error!("module {} failed: {}", module.name, e);
            ModuleResult::failed(module.clone(), format!("Processing error: {e}"), elapsed)
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!("module {} panicked: {}", module.name, message);
            ModuleResult::failed(module.clone(), format!("Processing panicked: {message}"), elapsed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PipelineError;
    use crate::observability::{MemorySink, NullSink};
    use crate::pipeline::ModuleOutput;
    use tempfile::TempDir;

    struct ScriptedProcessor;

    impl ModuleProcessor for ScriptedProcessor {
        fn process(&self, module: &ModuleDescriptor) -> Result<ModuleOutput, PipelineError> {
            match module.name.as_str() {
                "error" => Err(PipelineError::Other("parser crashed".into())),
                "panic" => panic!("unexpected state"),
                "slow" => {
                    std::thread::sleep(Duration::from_millis(300));
                    Ok(ModuleOutput::default())
                }
                "warn" => Ok(ModuleOutput {
                    warnings: vec!["one bad report".into()],
                    ..Default::default()
                }),
                _ => Ok(ModuleOutput::default()),
            }
        }
    }

    fn orchestrator(sink: Arc<dyn EventSink>) -> Orchestrator {
        Orchestrator::new(OrchestratorConfig::default(), Arc::new(ScriptedProcessor), sink).unwrap()
    }

    #[test]
    fn test_collect_maps_every_outcome() {
        let modules = vec![
            ModuleDescriptor::new("ok", "/ok"),
            ModuleDescriptor::new("error", "/error"),
            ModuleDescriptor::new("panic", "/panic"),
            ModuleDescriptor::new("warn", "/warn"),
            ModuleDescriptor::new("invalid", "/invalid").with_validation_error("Manifest not found"),
        ];
        let results = orchestrator(Arc::new(NullSink)).collect(modules);

        let statuses: Vec<_> = results.iter().map(|r| r.status()).collect();
        assert_eq!(
            statuses,
            vec![
                ModuleStatus::Success,
                ModuleStatus::Failed,
                ModuleStatus::Failed,
                ModuleStatus::PartialSuccess,
                ModuleStatus::Skipped,
            ]
        );
        assert_eq!(results[1].error(), Some("Processing error: parser crashed"));
        assert_eq!(results[2].error(), Some("Processing panicked: unexpected state"));
        assert_eq!(results[3].error(), Some("one bad report"));
        assert_eq!(results[4].error(), Some("Manifest not found"));
    }

    #[test]
    fn test_skipped_modules_never_start() {
        let sink = Arc::new(MemorySink::new());
        let modules = vec![
            ModuleDescriptor::new("ok", "/ok"),
            ModuleDescriptor::new("bad", "/bad").with_validation_error("nope"),
        ];
        orchestrator(sink.clone()).collect(modules);
        assert_eq!(sink.count("module-started"), 1);
        assert_eq!(sink.count("module-completed"), 2);
    }

    #[test]
    fn test_completion_events_follow_finish_order() {
        let sink = Arc::new(MemorySink::new());
        let modules = vec![
            ModuleDescriptor::new("slow", "/slow"),
            ModuleDescriptor::new("fast", "/fast"),
            ModuleDescriptor::new("invalid", "/invalid").with_validation_error("nope"),
        ];
        let results = orchestrator(sink.clone()).collect(modules);

        let completed: Vec<String> = sink
            .events()
            .into_iter()
            .filter_map(|event| match event {
                PipelineEvent::ModuleCompleted { module, .. } => Some(module),
                _ => None,
            })
            .collect();
        assert_eq!(completed, vec!["invalid", "fast", "slow"]);

        let names: Vec<_> = results.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["slow", "fast", "invalid"]);
    }

    #[test]
    fn test_run_writes_summary() {
        let temp = TempDir::new().unwrap();
        let results_dir = temp.path().join("out/results");
        let report = orchestrator(Arc::new(NullSink))
            .run(vec![ModuleDescriptor::new("ok", "/ok")], &results_dir)
            .unwrap();

        assert_eq!(report.successful(), 1);
        assert!(!report.has_failures());
        assert!(results_dir.join(output::SUMMARY_FILE).is_file());
        assert!(report.written.contains(&results_dir.join(output::SUMMARY_FILE)));
    }

    #[test]
    fn test_run_fails_when_results_dir_cannot_be_created() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let err = orchestrator(Arc::new(NullSink))
            .run(vec![], &blocker.join("results"))
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::ResultsDir { .. }));
    }

    #[test]
    fn test_sorted_by_name() {
        let modules = vec![ModuleDescriptor::new("zeta", "/z"), ModuleDescriptor::new("alpha", "/a")];
        let orchestrator = orchestrator(Arc::new(NullSink));
        let report = RunReport {
            results: orchestrator.collect(modules),
            aggregate: AggregateView::default(),
            elapsed: Duration::ZERO,
            written: vec![],
        };
        let names: Vec<_> = report.sorted_by_name().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert_eq!(report.results[0].name(), "zeta");
        assert!(orchestrator.shutdown());
    }
}
