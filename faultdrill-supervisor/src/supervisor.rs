//! Supervised run loop.
//!
//! # Sequence
//!
//! 1. `before` hook. A fault here is fatal: every scenario is reported as
//!    skipped and `after` does not run.
//! 2. Each scenario in declared order, one child process per scenario.
//!    Under [`IsolationPolicy::Isolate`] a fault never prevents the next
//!    scenario. Under [`IsolationPolicy::Halt`] every scenario after the
//!    first abnormal termination is reported as skipped.
//! 3. `after` hook.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, error, info, warn};

use faultdrill_core::config::SupervisorConfig;
use faultdrill_core::report::{HookReport, RunReport, ScenarioReport, last_output};
use faultdrill_core::types::{FaultKind, HookPoint, ScenarioSpec};

use crate::child::run_child;
use crate::classify::classify;
use crate::error::SupervisorError;
use crate::launcher::ScenarioLauncher;

/// What to do after a scenario terminates abnormally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationPolicy {
    /// Record the fault and continue with the next scenario.
    Isolate,
    /// Record the fault and skip every remaining scenario.
    Halt,
}

impl IsolationPolicy {
    /// Policy name as it appears in config and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Isolate => "isolate",
            Self::Halt => "halt",
        }
    }
}

impl fmt::Display for IsolationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IsolationPolicy {
    type Err = SupervisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "isolate" => Ok(Self::Isolate),
            "halt" => Ok(Self::Halt),
            other => Err(SupervisorError::InvalidPolicy(other.to_owned())),
        }
    }
}

/// Runtime settings derived from `[supervisor]`.
#[derive(Debug, Clone)]
pub struct SupervisorSettings {
    pub policy: IsolationPolicy,
    pub scenario_budget: Duration,
    pub hook_budget: Duration,
    pub capture_limit: usize,
}

impl SupervisorSettings {
    /// Convert the validated config section.
    pub fn from_core(config: &SupervisorConfig) -> Result<Self, SupervisorError> {
        Ok(Self {
            policy: config.policy.parse()?,
            scenario_budget: Duration::from_millis(config.scenario_timeout_ms),
            hook_budget: Duration::from_millis(config.hook_timeout_ms),
            capture_limit: config.capture_limit_bytes,
        })
    }
}

impl Default for SupervisorSettings {
    fn default() -> Self {
        let config = SupervisorConfig::default();
        Self {
            policy: IsolationPolicy::Isolate,
            scenario_budget: Duration::from_millis(config.scenario_timeout_ms),
            hook_budget: Duration::from_millis(config.hook_timeout_ms),
            capture_limit: config.capture_limit_bytes,
        }
    }
}

/// Runs hooks and scenarios in child processes and builds a [`RunReport`].
pub struct Supervisor<L> {
    launcher: L,
    settings: SupervisorSettings,
    scenarios: Vec<ScenarioSpec>,
}

impl<L: ScenarioLauncher> Supervisor<L> {
    /// Supervise `scenarios` (in this order) using `launcher` to start children.
    pub fn new(launcher: L, settings: SupervisorSettings, scenarios: Vec<ScenarioSpec>) -> Self {
        Self {
            launcher,
            settings,
            scenarios,
        }
    }

    /// Execute the full sequence and return the finalized report.
    ///
    /// Faults observed in children are part of the report. An error is only
    /// returned when the supervisor itself cannot spawn or reap a child.
    pub async fn run(&self) -> Result<RunReport> {
        let mut report = RunReport::new(self.settings.policy.as_str());
        info!(
            run_id = %report.run_id,
            policy = %self.settings.policy,
            scenarios = self.scenarios.len(),
            "supervised run starting"
        );

        let before = self.run_hook(HookPoint::Before).await?;
        let before_clean = before.is_clean();
        report.hooks.push(before);

        if !before_clean {
            error!(
                run_id = %report.run_id,
                "before hook faulted, no scenario will run"
            );
            report.scenarios = self
                .scenarios
                .iter()
                .map(|spec| ScenarioReport::skipped(&spec.name, spec.kind))
                .collect();
            report.finalize();
            return Ok(report);
        }

        let mut halted_by: Option<String> = None;
        for spec in &self.scenarios {
            if let Some(ref culprit) = halted_by {
                debug!(scenario = %spec.name, halted_by = %culprit, "skipping scenario");
                report
                    .scenarios
                    .push(ScenarioReport::skipped(&spec.name, spec.kind));
                continue;
            }

            let scenario = self.run_scenario(spec).await?;
            let abnormal = scenario.observed.is_some_and(|kind| !kind.is_none());
            if abnormal && self.settings.policy == IsolationPolicy::Halt {
                warn!(
                    scenario = %spec.name,
                    "halt policy: skipping remaining scenarios"
                );
                halted_by = Some(spec.name.clone());
            }
            report.scenarios.push(scenario);
        }

        let after = self.run_hook(HookPoint::After).await?;
        report.hooks.push(after);

        report.finalize();
        info!(
            run_id = %report.run_id,
            status = %report.status,
            "supervised run finished"
        );
        Ok(report)
    }

    /// Run one scenario in a child process and judge it.
    pub async fn run_scenario(&self, spec: &ScenarioSpec) -> Result<ScenarioReport> {
        debug!(scenario = %spec.name, declared = %spec.kind, "launching scenario");
        let outcome = run_child(
            self.launcher.scenario_command(&spec.name),
            self.settings.scenario_budget,
            self.settings.capture_limit,
        )
        .await
        .map_err(|e| anyhow::anyhow!("failed to supervise scenario '{}': {}", spec.name, e))?;

        let observed = classify(&outcome.termination, &outcome.runtime);
        let mut report = ScenarioReport::observed(
            &spec.name,
            spec.kind,
            observed,
            last_output(&outcome.primary),
        );
        report.exit_code = outcome.termination.exit_code;
        report.signal = outcome.termination.signal;
        report.duration_ms = u64::try_from(outcome.duration.as_millis()).unwrap_or(u64::MAX);

        if outcome.discarded_bytes > 0 {
            debug!(
                scenario = %spec.name,
                discarded = outcome.discarded_bytes,
                "capture limit reached"
            );
        }
        if let (Some(expected), Some(last)) = (&spec.expected_output, &report.last_output)
            && expected != last
        {
            debug!(
                scenario = %spec.name,
                expected = %expected,
                last = %last,
                "last output differs from expected marker"
            );
        }

        if report.is_matched() {
            info!(scenario = %spec.name, kind = %observed, "{}", report.summary());
        } else {
            warn!(
                scenario = %spec.name,
                declared = %spec.kind,
                observed = %observed,
                stderr_tail = %outcome.diagnostic.trim_end(),
                "scenario did not produce its declared fault"
            );
        }
        Ok(report)
    }

    /// Run one hook in a child process.
    ///
    /// Any abnormal termination of a hook is a harness defect.
    pub async fn run_hook(&self, point: HookPoint) -> Result<HookReport> {
        debug!(hook = %point, "launching hook");
        let outcome = run_child(
            self.launcher.hook_command(point),
            self.settings.hook_budget,
            self.settings.capture_limit,
        )
        .await
        .map_err(|e| anyhow::anyhow!("failed to supervise hook '{}': {}", point, e))?;

        let observed = match classify(&outcome.termination, &outcome.runtime) {
            FaultKind::None => FaultKind::None,
            other => {
                error!(hook = %point, termination = %other, "hook faulted");
                FaultKind::HarnessSelfTestFailure
            }
        };

        Ok(HookReport {
            hook: point,
            observed,
            marker_lines: outcome.primary.lines().filter(|l| !l.is_empty()).count(),
        })
    }
}
