//! Child command construction.

use std::path::{Path, PathBuf};

use tokio::process::Command;

use faultdrill_core::types::HookPoint;

/// Builds the command that runs one scenario or one hook in a fresh process.
///
/// The supervisor only configures stdio, process group and budget on the
/// returned command; everything else is up to the launcher.
pub trait ScenarioLauncher: Send + Sync {
    /// Command that runs the named scenario and nothing else.
    fn scenario_command(&self, name: &str) -> Command;

    /// Command that runs a single hook.
    fn hook_command(&self, point: HookPoint) -> Command;
}

/// Re-invokes a `faultdrill` binary with its `scenario` / `hook` subcommands.
#[derive(Debug, Clone)]
pub struct SelfExeLauncher {
    program: PathBuf,
}

impl SelfExeLauncher {
    /// Launch children through `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Launch children through the currently running executable.
    pub fn current() -> std::io::Result<Self> {
        std::env::current_exe().map(Self::new)
    }

    /// Path of the binary children are launched from.
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn base(&self) -> Command {
        let mut command = Command::new(&self.program);
        // Keep the diagnostic channel to the runtime's one-line report.
        command.env("RUST_BACKTRACE", "0");
        command
    }
}

impl ScenarioLauncher for SelfExeLauncher {
    fn scenario_command(&self, name: &str) -> Command {
        let mut command = self.base();
        command.arg("scenario").arg(name);
        command
    }

    fn hook_command(&self, point: HookPoint) -> Command {
        let mut command = self.base();
        command.arg("hook").arg(point.as_str());
        command
    }
}
