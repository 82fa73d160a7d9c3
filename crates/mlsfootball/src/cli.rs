//! CLI command definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use mlsfootball_core::DEFAULT_STACK_ID;

/// Synthesize, validate and plan the MLS football stack.
#[derive(Debug, Parser)]
#[command(name = "mlsfootball")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: Global,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Silence non-essential output
    #[arg(long, global = true)]
    pub silent: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Stack identifier
    #[arg(long, global = true, default_value = DEFAULT_STACK_ID)]
    pub stack_id: String,

    /// Deployment account (overrides CDK_DEFAULT_ACCOUNT)
    #[arg(long, global = true)]
    pub account: Option<String>,

    /// Deployment region (overrides CDK_DEFAULT_REGION)
    #[arg(long, global = true)]
    pub region: Option<String>,
}

impl Global {
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output with colors.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Synthesize the stack template
    Synth {
        /// Write `<stack-id>.template.json` into this directory instead of stdout
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Compose and validate the stack without writing anything
    Validate,

    /// Print the GraphQL schema attached to the API
    Schema,

    /// Show what a deploy would change compared to a deployed template
    #[command(long_about = "Show what a deploy would change compared to a deployed template.

The deployed template is a file previously written by `synth`. A missing file
means nothing is deployed yet, so every resource is created.")]
    Plan {
        /// Previously deployed template
        #[arg(long, value_name = "FILE")]
        current: PathBuf,
    },

    /// Show what tearing down a deployed template would delete
    Destroy {
        /// Previously deployed template
        #[arg(long, value_name = "FILE")]
        current: PathBuf,
    },
}
