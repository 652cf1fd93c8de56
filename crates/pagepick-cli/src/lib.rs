#![forbid(unsafe_code)]

//! Command-line inspector for workspace snapshots.

pub mod cli;
pub mod error;
pub mod logging;
pub mod render;

pub use cli::{Cli, Commands, run, run_from_env, run_with_writer};
pub use error::{CliError, Result};
