//! CLI argument parsing using clap derive API
//!
//! Purely declarative: no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use faultdrill_core::types::HookPoint;

/// faultdrill -- deterministic fault scenarios for exercising a supervisor.
///
/// Use `faultdrill <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "faultdrill", version, about, long_about = None)]
pub struct Cli {
    /// Path to a faultdrill.toml configuration file (defaults apply when omitted).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the scenario catalog.
    List,

    /// Run hooks and scenarios in this process, stopping at the first fault.
    Run(RunArgs),

    /// Run a single scenario in this process.
    Scenario(ScenarioArgs),

    /// Run a single lifecycle hook in this process.
    Hook(HookArgs),

    /// Run every scenario in its own child process and report how each ended.
    Supervise(SuperviseArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

/// Names are matched exactly against the catalog.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Restrict the run to these scenarios (repeatable).
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ScenarioArgs {
    /// Scenario name, e.g. `segfaultTest`.
    pub name: String,
}

#[derive(Args, Debug)]
pub struct HookArgs {
    /// Which hook to run.
    pub point: HookArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HookArg {
    Before,
    After,
}

impl From<HookArg> for HookPoint {
    fn from(arg: HookArg) -> Self {
        match arg {
            HookArg::Before => HookPoint::Before,
            HookArg::After => HookPoint::After,
        }
    }
}

#[derive(Args, Debug)]
pub struct SuperviseArgs {
    /// Isolation policy (overrides `supervisor.policy`).
    #[arg(long)]
    pub policy: Option<PolicyArg>,

    /// Per-scenario time budget in milliseconds (overrides `supervisor.scenario_timeout_ms`).
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Restrict the run to these scenarios (repeatable).
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Continue after a faulting scenario.
    Isolate,
    /// Skip every scenario after the first fault.
    Halt,
}

impl PolicyArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Isolate => "isolate",
            Self::Halt => "halt",
        }
    }
}

// ---- config ----

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, supervisor, scenarios).
        #[arg(long)]
        section: Option<String>,
    },
}
