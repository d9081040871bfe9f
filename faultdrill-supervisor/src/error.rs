//! Supervisor error types.

/// Errors raised while supervising a child.
///
/// A child that faults is not an error: that is the observation the
/// supervisor exists to make. These variants cover failures of the
/// supervisor itself.
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    /// The child process could not be started.
    #[error("failed to spawn child: {0}")]
    Spawn(#[source] std::io::Error),

    /// A standard stream was not piped as requested.
    #[error("child {0} was not captured")]
    MissingPipe(&'static str),

    /// Waiting for or killing the child failed.
    #[error("failed to wait for child: {0}")]
    Wait(#[source] std::io::Error),

    /// Reading a captured channel failed.
    #[error("failed to capture child output: {0}")]
    Capture(#[source] std::io::Error),

    /// A capture task panicked or was cancelled.
    #[error("capture task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Unknown isolation policy name.
    #[error("unknown isolation policy '{0}' (expected: isolate, halt)")]
    InvalidPolicy(String),
}
