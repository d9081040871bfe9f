//! `faultdrill scenario` command handler -- the supervisor's per-scenario child.

use faultdrill_scenarios::{RunConfig, Runner, StdSink, catalog};

use crate::cli::ScenarioArgs;
use crate::error::CliError;

/// Run exactly one scenario with no hooks.
pub fn execute(args: ScenarioArgs) -> Result<(), CliError> {
    let runner = Runner::new(catalog::standard()?, RunConfig::new());
    runner.run_scenario(&args.name, &mut StdSink::new())?;
    Ok(())
}
