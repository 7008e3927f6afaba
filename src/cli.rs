use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "testmap")]
#[command(about = "Correlate test methods with code coverage across Maven modules", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process every module of a project and write the correlation reports
    Run {
        /// Project root containing the parent pom.xml
        #[arg(default_value = ".")]
        project: PathBuf,

        /// Directory for the generated reports
        #[arg(short, long, default_value = "testmap-results")]
        output: PathBuf,

        /// Configuration file (defaults to the nearest .testmap.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of modules processed in parallel
        #[arg(short, long, env = "TESTMAP_JOBS")]
        jobs: Option<usize>,

        /// Per-module timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Only keep coverage for these package prefixes
        #[arg(long, value_delimiter = ',')]
        packages: Option<Vec<String>>,

        /// Disable the method-name-only match strategy
        #[arg(long)]
        no_method_fallback: bool,

        /// Console output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,
    },

    /// List the modules of a project and whether they can be processed
    Modules {
        /// Project root containing the parent pom.xml
        #[arg(default_value = ".")]
        project: PathBuf,

        /// Configuration file (defaults to the nearest .testmap.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write a default .testmap.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Summary table
    Terminal,
    /// The modules summary as JSON on stdout
    Json,
}
