//! CLI-specific error types and exit code mapping

use faultdrill_core::error::{FaultdrillError, ScenarioError};
use faultdrill_core::exit_code;
use faultdrill_core::report::RunStatus;
use faultdrill_scenarios::RunnerError;

/// CLI-specific error type.
///
/// The `exit_code()` method maps every error to one of the codes in
/// [`faultdrill_core::exit_code`]. A supervisor reading a child's status
/// relies on these staying fixed.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdout write, current_exe lookup, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from faultdrill-core.
    #[error("{0}")]
    Core(#[from] FaultdrillError),

    /// In-process runner error, including faults propagated out of a scenario.
    #[error("{0}")]
    Runner(#[from] RunnerError),

    /// Supervisor or logging setup failure.
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),

    /// Supervised run finished without passing.
    #[error("supervised run {0}")]
    RunOutcome(RunStatus),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                   |
    /// |------|-------------------------------------------|
    /// | 0    | Success                                   |
    /// | 1    | General / command error                   |
    /// | 2    | Configuration error                       |
    /// | 3    | Logic error propagated out of a scenario  |
    /// | 4    | Harness self-test failure                 |
    /// | 5    | Supervised run halted by policy           |
    /// | 10   | IO error                                  |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => exit_code::CONFIG,
            Self::Io(_) => exit_code::IO,
            Self::Core(FaultdrillError::Config(_)) => exit_code::CONFIG,
            Self::Core(FaultdrillError::Io(_)) => exit_code::IO,
            Self::Core(FaultdrillError::Scenario(ScenarioError::Logic(_))) => {
                exit_code::LOGIC_ERROR
            }
            Self::Core(FaultdrillError::Scenario(ScenarioError::Output(_))) => exit_code::IO,
            Self::Runner(e) => e.exit_code(),
            Self::RunOutcome(status) => status.exit_code(),
            Self::JsonSerialize(_) | Self::Command(_) | Self::Internal(_) => exit_code::GENERAL,
        }
    }
}
