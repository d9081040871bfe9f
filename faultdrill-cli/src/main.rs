//! faultdrill -- fault scenario harness.
//!
//! Channel commands (`run`, `scenario`, `hook`) write nothing but scenario
//! output and install no tracing subscriber. Report commands (`list`,
//! `supervise`, `config`) log to stderr and render to stdout.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::path::Path;

use clap::Parser;

use faultdrill_core::config::FaultdrillConfig;
use faultdrill_core::error::FaultdrillError;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match dispatch(cli).await {
        Ok(()) => faultdrill_core::exit_code::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    };
    std::process::exit(code);
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);
    let config_path = cli.config.as_deref();
    let log_level = cli.log_level.as_deref();

    match cli.command {
        Commands::Run(args) => commands::run::execute(args, config_path).await,
        Commands::Scenario(args) => commands::scenario::execute(args),
        Commands::Hook(args) => commands::hook::execute(args),
        Commands::List => {
            start_reporting(config_path, log_level).await??;
            commands::list::execute(&writer)
        }
        Commands::Supervise(args) => {
            let loaded = start_reporting(config_path, log_level).await?;
            commands::supervise::execute(args, loaded?, &writer).await
        }
        Commands::Config(args) => {
            let loaded = start_reporting(config_path, log_level).await?;
            commands::config::execute(args, config_path, loaded, &writer)
        }
    }
}

/// Load the configuration and install logging for a report command.
///
/// The load result is handed back unchanged: `config validate` reports an
/// invalid file instead of failing on it, so logging falls back to defaults.
async fn start_reporting(
    config_path: Option<&Path>,
    log_level: Option<&str>,
) -> Result<Result<FaultdrillConfig, FaultdrillError>, CliError> {
    let loaded = FaultdrillConfig::load_or_default(config_path).await;
    let general = loaded
        .as_ref()
        .map(|config| config.general.clone())
        .unwrap_or_default();
    logging::init_tracing(&general, log_level)?;
    tracing::debug!(config = ?config_path, "faultdrill starting");
    Ok(loaded)
}
