use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use testmap::cli::{Cli, Commands};
use testmap::commands::run::{run_project, RunOptions};
use testmap::config::ConfigOverrides;
use testmap::observability::init_logging;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            project,
            output,
            config,
            jobs,
            timeout_secs,
            packages,
            no_method_fallback,
            format,
        } => run_project(RunOptions {
            project,
            output,
            config,
            overrides: ConfigOverrides {
                jobs,
                timeout_secs,
                packages,
                no_method_fallback,
            },
            format,
        }),
        Commands::Modules { project, config } => {
            testmap::commands::modules::list_modules(&project, config.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Init { force } => {
            testmap::commands::init::init_config(force)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
