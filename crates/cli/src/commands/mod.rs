//! Subcommand implementations.

pub mod process;
pub mod run;
