//! `faultdrill supervise` command handler
//!
//! Re-launches this binary once per hook and scenario (`faultdrill hook ...`,
//! `faultdrill scenario ...`) and renders the resulting run report.

use std::io::Write;

use tracing::info;

use faultdrill_core::config::FaultdrillConfig;
use faultdrill_core::report::{RunReport, RunStatus, ScenarioStatus};
use faultdrill_scenarios::catalog;
use faultdrill_supervisor::{SelfExeLauncher, Supervisor, SupervisorSettings};

use crate::cli::SuperviseArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

pub async fn execute(
    args: SuperviseArgs,
    mut config: FaultdrillConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    apply_flags(&mut config, &args);
    config.validate()?;

    let scenarios = catalog::standard()?.select(&config.scenarios)?;
    let settings = SupervisorSettings::from_core(&config.supervisor)
        .map_err(|e| CliError::Config(e.to_string()))?;
    let launcher = SelfExeLauncher::current()?;
    info!(
        program = %launcher.program().display(),
        policy = %settings.policy,
        scenarios = scenarios.len(),
        "supervising catalog"
    );

    let supervisor = Supervisor::new(launcher, settings, scenarios.specs());
    let report = supervisor.run().await?;
    writer.render(&report)?;

    match report.status {
        RunStatus::Passed => Ok(()),
        status => Err(CliError::RunOutcome(status)),
    }
}

/// CLI flags take precedence over file and environment.
fn apply_flags(config: &mut FaultdrillConfig, args: &SuperviseArgs) {
    if let Some(policy) = args.policy {
        config.supervisor.policy = policy.as_str().to_owned();
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.supervisor.scenario_timeout_ms = timeout_ms;
    }
    if !args.only.is_empty() {
        config.scenarios.only = args.only.clone();
    }
}

impl Render for RunReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Run {} (policy: {})",
            self.run_id.bold(),
            self.policy
        )?;

        for hook in &self.hooks {
            let state = if hook.is_clean() {
                "ok".green()
            } else {
                hook.observed.as_str().red()
            };
            writeln!(
                w,
                "  hook {:<6} {} ({} marker lines)",
                hook.hook.as_str(),
                state,
                hook.marker_lines
            )?;
        }
        writeln!(w)?;

        for scenario in &self.scenarios {
            let status = match scenario.status {
                ScenarioStatus::Matched => "MATCH".green().bold(),
                ScenarioStatus::Mismatched => "MISMATCH".red().bold(),
                ScenarioStatus::Skipped => "SKIPPED".yellow().bold(),
            };
            writeln!(w, "  {:<9} {}", status, scenario.summary())?;
            if scenario.status == ScenarioStatus::Mismatched {
                let observed = scenario.observed.map_or("-", |kind| kind.as_str());
                writeln!(
                    w,
                    "            declared {} but observed {}",
                    scenario.declared, observed
                )?;
            }
        }
        writeln!(w)?;

        let result = match self.status {
            RunStatus::Passed => "PASSED".green().bold(),
            RunStatus::Failed => "FAILED".red().bold(),
            RunStatus::Halted => "HALTED".yellow().bold(),
        };
        writeln!(w, "Result: {}", result)?;
        Ok(())
    }
}
