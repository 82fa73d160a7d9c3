//! mlsfootball CLI entry point.

mod cli;
mod commands;
mod config;
mod output;
mod prelude;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Global};

const DEFAULT_FILTER: &str = "mlsfootball=info,mlsfootball_core=info";
const VERBOSE_FILTER: &str = "mlsfootball=debug,mlsfootball_core=debug";
const SILENT_FILTER: &str = "mlsfootball=warn,mlsfootball_core=warn";

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.global);

    commands::run(cli.command, cli.global)
}

/// Logs go to stderr so that templates and SDL can be piped from stdout.
fn init_tracing(global: &Global) {
    let filter = if global.is_verbose() {
        EnvFilter::new(VERBOSE_FILTER)
    } else if global.is_silent() {
        EnvFilter::new(SILENT_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
