//! Command-line interface for notebatch.
//!
//! `notebatch run` discovers audio files and converts them one at a time by
//! re-invoking this binary as `notebatch process <FILE>` for every item.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "NOTEBATCH_CONFIG";

/// Notebatch - sequential batch conversion of audio recordings into notes.
#[derive(Debug, Parser)]
#[command(name = "notebatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML).
    #[arg(long, short = 'c', env = CONFIG_ENV, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Discover audio files and process each one in its own worker process.
    Run(commands::run::RunArgs),
    /// Generate the note for a single audio file.
    Process(commands::process::ProcessArgs),
}
