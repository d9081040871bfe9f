//! Command handlers -- one module per subcommand

pub mod config;
pub mod hook;
pub mod list;
pub mod run;
pub mod scenario;
pub mod supervise;
