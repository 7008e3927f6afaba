//! Per-module processing: scan, extract, normalize, correlate, then attach
//! recorded test outcomes.
//!
//! [`ModuleProcessor`] is the seam the orchestrator schedules. Each call owns
//! all of its state (test list, coverage list, index); nothing is shared
//! between modules.

use crate::config::TestmapConfig;
use crate::core::{CoverageRecord, ModuleDescriptor, ModuleResult, TestMethodRecord};
use crate::correlation::{CorrelationEngine, CorrelationReport};
use crate::coverage::CoverageNormalizer;
use crate::errors::PipelineError;
use crate::inventory::extract_tests;
use crate::io::{scan_coverage_reports, scan_surefire_reports, scan_test_sources};
use crate::observability::{default_sink, EventSink};
use crate::surefire::{merge_executions, parse_surefire_reports, ExecutionMerge};
use std::fs;
use std::sync::Arc;
use std::time::Duration;

/// What one module produced.
#[derive(Debug, Clone, Default)]
pub struct ModuleOutput {
    pub tests: Vec<TestMethodRecord>,
    pub coverage: Vec<CoverageRecord>,
    pub correlation: CorrelationReport,
    /// Recoverable problems; any entry makes the module a partial success.
    pub warnings: Vec<String>,
}

impl ModuleOutput {
    pub fn into_result(self, descriptor: ModuleDescriptor, elapsed: Duration) -> ModuleResult {
        if self.warnings.is_empty() {
            ModuleResult::success(descriptor, self.tests, self.coverage, elapsed)
        } else {
            let message = self.warnings.join("; ");
            ModuleResult::partial(descriptor, self.tests, self.coverage, message, elapsed)
        }
    }
}

/// Processes one module. Called from worker threads.
pub trait ModuleProcessor: Send + Sync + 'static {
    fn process(&self, module: &ModuleDescriptor) -> Result<ModuleOutput, PipelineError>;
}

/// The standard processor for Maven-style Java modules.
pub struct ModulePipeline {
    config: TestmapConfig,
    sink: Arc<dyn EventSink>,
}

impl ModulePipeline {
    pub fn new(config: TestmapConfig) -> Self {
        Self {
            config,
            sink: default_sink(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    fn extract_inventory(&self, module: &ModuleDescriptor, warnings: &mut Vec<String>) -> Vec<TestMethodRecord> {
        let sources = scan_test_sources(&module.test_dir, &self.config.scan);
        tracing::debug!("{}: {} test sources", module.name, sources.len());

        let mut tests = Vec::new();
        for source in &sources {
            match extract_tests(source) {
                Ok(found) => tests.extend(found),
                Err(e) => {
                    tracing::warn!("{}: {}", module.name, e);
                    warnings.push(e.to_string());
                }
            }
        }
        tests
    }

    fn normalize_coverage(
        &self,
        module: &ModuleDescriptor,
        warnings: &mut Vec<String>,
    ) -> Result<Vec<CoverageRecord>, PipelineError> {
        let search_root = if module.coverage_dir.is_dir() {
            &module.coverage_dir
        } else {
            &module.root
        };
        let reports = scan_coverage_reports(search_root, &self.config.coverage, &self.config.scan);
        if reports.is_empty() {
            tracing::info!("{}: no coverage reports under {}", module.name, search_root.display());
            return Ok(Vec::new());
        }

        let outcome = CoverageNormalizer::new(self.config.coverage.clone())
            .with_sink(Arc::clone(&self.sink))
            .normalize_detailed(&reports)?;
        warnings.extend(outcome.problems().map(|e| e.to_string()));
        Ok(outcome.records)
    }

    /// Attach Surefire outcomes. Unreadable reports become warnings.
    fn merge_test_runs(
        &self,
        module: &ModuleDescriptor,
        tests: &mut [TestMethodRecord],
        warnings: &mut Vec<String>,
    ) -> ExecutionMerge {
        // Only the report directory: `test-*.xml` fixtures under src are not reports.
        if !module.execution_dir.is_dir() {
            tracing::debug!("{}: no test-run reports", module.name);
            return ExecutionMerge::default();
        }
        let reports = scan_surefire_reports(&module.execution_dir, &self.config.scan);
        if reports.is_empty() {
            tracing::debug!("{}: no test-run reports under {}", module.name, module.execution_dir.display());
            return ExecutionMerge::default();
        }

        let parsed = parse_surefire_reports(&reports, self.config.coverage.max_report_bytes);
        warnings.extend(parsed.problems.iter().map(|e| e.to_string()));
        merge_executions(tests, &parsed.suites)
    }
}

impl ModuleProcessor for ModulePipeline {
    fn process(&self, module: &ModuleDescriptor) -> Result<ModuleOutput, PipelineError> {
        fs::read_dir(&module.test_dir).map_err(|source| PipelineError::TestDir {
            path: module.test_dir.clone(),
            source,
        })?;

        let mut warnings = Vec::new();
        let mut tests = self.extract_inventory(module, &mut warnings);
        let coverage = self.normalize_coverage(module, &mut warnings)?;

        let correlation = CorrelationEngine::new(&self.config.correlation)
            .with_sink(Arc::clone(&self.sink))
            .correlate(&mut tests, &coverage);
        let executions = self.merge_test_runs(module, &mut tests, &mut warnings);

        tracing::info!(
            "{}: {} tests, {} coverage records, {} correlated, {} with recorded outcomes",
            module.name,
            tests.len(),
            coverage.len(),
            correlation.matched(),
            executions.matched
        );

        Ok(ModuleOutput {
            tests,
            coverage,
            correlation,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExecutionStatus, ModuleStatus};
    use crate::observability::NullSink;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn pipeline() -> ModulePipeline {
        ModulePipeline::new(TestmapConfig::default()).with_sink(Arc::new(NullSink))
    }

    #[test]
    fn test_process_correlates_module() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(
            &root.join("src/test/java/com/example/GreeterTest.java"),
            "package com.example;\nclass GreeterTest {\n @Test void testGreet() {}\n @Test void testWave() {}\n}\n",
        );
        write(
            &root.join("target/site/jacoco/jacoco.xml"),
            r#"<report name="m"><package name="com/example"><class name="com/example/Greeter">
                <method name="greet"><counter type="BRANCH" missed="1" covered="3"/></method>
            </class></package></report>"#,
        );

        let module = ModuleDescriptor::new("m", root);
        let output = pipeline().process(&module).unwrap();

        assert_eq!(output.tests.len(), 2);
        assert_eq!(output.coverage.len(), 1);
        assert_eq!(output.correlation.matched(), 1);
        assert_eq!(output.tests[0].coverage_percent, 75.0);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_process_without_coverage() {
        let temp = TempDir::new().unwrap();
        write(
            &temp.path().join("src/test/java/ATest.java"),
            "class ATest { @Test void testA() {} }",
        );
        let output = pipeline().process(&ModuleDescriptor::new("m", temp.path())).unwrap();
        assert_eq!(output.tests.len(), 1);
        assert!(output.coverage.is_empty());
        assert!(!output.tests[0].is_correlated());
    }

    #[test]
    fn test_process_collects_warnings() {
        let temp = TempDir::new().unwrap();
        write(&temp.path().join("src/test/java/Broken.java"), "interface Broken {}");
        write(&temp.path().join("target/site/jacoco/jacoco.xml"), "<report>");

        let module = ModuleDescriptor::new("m", temp.path());
        let output = pipeline().process(&module).unwrap();
        assert_eq!(output.warnings.len(), 2);

        let result = output.into_result(module, Duration::from_millis(3));
        assert_eq!(result.status(), ModuleStatus::PartialSuccess);
        assert!(result.error().unwrap().contains("no class declaration"));
    }

    #[test]
    fn test_process_attaches_recorded_outcomes() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(
            &root.join("src/test/java/com/example/GreeterTest.java"),
            "package com.example;\nclass GreeterTest {\n @Test void testGreet() {}\n @Test void testWave() {}\n}\n",
        );
        write(
            &root.join("target/surefire-reports/TEST-com.example.GreeterTest.xml"),
            r#"<testsuite name="com.example.GreeterTest" tests="1" failures="1">
                <testcase name="testGreet" classname="com.example.GreeterTest" time="0.5">
                    <failure message="expected hi"/>
                </testcase>
            </testsuite>"#,
        );
        write(&root.join("target/surefire-reports/TEST-broken.xml"), "<nothing/>");

        let output = pipeline().process(&ModuleDescriptor::new("m", root)).unwrap();

        let greet = output.tests.iter().find(|t| t.method_name == "testGreet").unwrap();
        let execution = greet.execution.as_ref().unwrap();
        assert_eq!(execution.status, ExecutionStatus::Failed);
        assert_eq!(execution.message.as_deref(), Some("expected hi"));
        let wave = output.tests.iter().find(|t| t.method_name == "testWave").unwrap();
        assert!(wave.execution.is_none());
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].contains("TEST-broken.xml"));
    }

    #[test]
    fn test_process_missing_test_dir_fails() {
        let temp = TempDir::new().unwrap();
        let err = pipeline()
            .process(&ModuleDescriptor::new("m", temp.path()))
            .unwrap_err();
        assert!(matches!(err, PipelineError::TestDir { .. }));
    }
}
