//! `faultdrill run` command handler
//!
//! In-process runner entry point: `before`, the selected scenarios in
//! declared order, `after`. Nothing intercepts a fault, so the first
//! faulting scenario ends the process.

use std::path::Path;

use faultdrill_core::config::FaultdrillConfig;
use faultdrill_scenarios::{RunConfig, Runner, StdSink, catalog};

use crate::cli::RunArgs;
use crate::error::CliError;

pub async fn execute(args: RunArgs, config_path: Option<&Path>) -> Result<(), CliError> {
    let config = FaultdrillConfig::load_or_default(config_path).await?;
    let mut selection = config.scenarios;
    if !args.only.is_empty() {
        selection.only = args.only;
    }

    let scenarios = catalog::standard()?.select(&selection)?;
    let runner = Runner::new(scenarios, RunConfig::standard());
    runner.run(&mut StdSink::new())?;
    Ok(())
}
