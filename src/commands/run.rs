use super::resolve_config;
use crate::cli::OutputFormat;
use crate::config::ConfigOverrides;
use crate::modules::discover_modules;
use crate::observability::{default_sink, EventSink};
use crate::orchestrator::Orchestrator;
use crate::output::{self, RunSummary};
use crate::pipeline::ModulePipeline;
use crate::progress::ProgressBarSink;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub project: PathBuf,
    pub output: PathBuf,
    pub config: Option<PathBuf>,
    pub overrides: ConfigOverrides,
    pub format: OutputFormat,
}

/// Discover, process and report. Exits 1 when any module failed or timed out.
pub fn run_project(options: RunOptions) -> Result<ExitCode> {
    let config = resolve_config(options.config.as_deref())?
        .with_overrides(&options.overrides)
        .context("Invalid command-line override")?;

    let modules = discover_modules(&options.project, &config.scan)
        .with_context(|| format!("Failed to discover modules in {}", options.project.display()))?;
    tracing::info!("{} modules found in {}", modules.len(), options.project.display());

    let progress = Arc::new(ProgressBarSink::new(modules.len(), default_sink()));
    let sink: Arc<dyn EventSink> = progress.clone();
    let pipeline = ModulePipeline::new(config.clone()).with_sink(Arc::clone(&sink));
    let orchestrator = Orchestrator::new(config.orchestrator.clone(), Arc::new(pipeline), sink)
        .context("Failed to start worker pool")?;

    let report = orchestrator.run(modules, &options.output)?;
    progress.finish();

    match options.format {
        OutputFormat::Terminal => {
            println!("{}", output::render_summary_table(&report));
            println!("Reports written to {}", options.output.display());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&RunSummary::from_results(&report.results))?);
        }
    }

    orchestrator.shutdown();

    Ok(if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
