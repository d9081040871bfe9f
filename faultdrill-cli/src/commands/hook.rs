//! `faultdrill hook` command handler -- the supervisor's per-hook child.

use faultdrill_scenarios::{Catalog, RunConfig, Runner, StdSink};

use crate::cli::HookArgs;
use crate::error::CliError;

pub fn execute(args: HookArgs) -> Result<(), CliError> {
    let runner = Runner::new(Catalog::new(), RunConfig::standard());
    runner.run_hook(args.point.into(), &mut StdSink::new())?;
    Ok(())
}
