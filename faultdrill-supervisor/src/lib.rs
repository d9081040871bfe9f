//! faultdrill supervisor library.
//!
//! Runs the `before` hook, every scenario and the `after` hook, each in a
//! child process of its own, and turns the way each child ended into a
//! [`FaultKind`](faultdrill_core::FaultKind).
//!
//! - [`launcher`] -- builds the command line for a scenario or hook child
//! - [`child`] -- spawns a child, captures both channels, enforces the time budget
//! - [`classify`] -- maps a child's termination to a fault kind
//! - [`supervisor`] -- the run loop and isolation policy

pub mod child;
pub mod classify;
pub mod error;
pub mod launcher;
pub mod supervisor;

pub use child::{ChildOutcome, run_child};
pub use classify::{MessageScanner, RuntimeMessages, Termination, classify};
pub use error::SupervisorError;
pub use launcher::{ScenarioLauncher, SelfExeLauncher};
pub use supervisor::{IsolationPolicy, Supervisor, SupervisorSettings};
