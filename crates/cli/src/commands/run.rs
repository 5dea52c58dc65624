//! Run command - process every discovered file in sequence.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::{error, info, warn};

use notebatch_core::{
    load_config, validate_config, BatchOrchestrator, Config, ProcessLauncher, RunSummary,
    SanitizedConfig,
};

use crate::CONFIG_ENV;

/// Arguments for the run command.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Directory to scan (defaults to the current directory).
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Glob pattern relative to the root.
    #[arg(long)]
    pub pattern: Option<String>,

    /// Directory name to skip (repeatable). Replaces the configured list.
    #[arg(long = "ignore")]
    pub ignore: Vec<String>,

    /// Delay between items in milliseconds.
    #[arg(long)]
    pub pacing_ms: Option<u64>,

    /// Write the run summary as JSON to this file.
    #[arg(long)]
    pub summary_json: Option<PathBuf>,
}

impl RunArgs {
    /// Apply flag overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(root) = &self.root {
            config.discovery.root = Some(root.clone());
        }
        if let Some(pattern) = &self.pattern {
            config.discovery.pattern = pattern.clone();
        }
        if !self.ignore.is_empty() {
            config.discovery.ignore = self.ignore.clone();
        }
        if let Some(ms) = self.pacing_ms {
            config.orchestrator.pacing_interval_ms = ms;
        }
    }
}

/// Execute the run command.
///
/// # Errors
///
/// Returns an error only when the run cannot start: bad configuration, an
/// unusable worker command, or a failed discovery. Item failures are reported
/// in the summary.
pub async fn execute(args: RunArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = load_config(config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    args.apply(&mut config);
    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = serde_json::to_string(&SanitizedConfig::from(&config)).unwrap_or_default();
    info!("Configuration: {}", sanitized);

    let mut worker = config.worker.clone();
    if worker.program.is_none() {
        // self-invoked workers must read the same file
        if let Some(path) = config_path {
            let path = std::path::absolute(path).context("Failed to resolve config path")?;
            worker = worker.with_env(CONFIG_ENV, path.display().to_string());
        }
    }
    let launcher = ProcessLauncher::new(worker).context("Failed to prepare worker command")?;
    info!("Worker command: {}", launcher.program().display());

    let orchestrator = BatchOrchestrator::new(config.orchestrator.clone(), launcher);
    let summary = orchestrator
        .run(&config.discovery)
        .await
        .context("Failed to start batch")?;

    if summary.total == 0 {
        warn!(
            "No files found matching {:?} under {}",
            config.discovery.pattern,
            config
                .discovery
                .root
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| ".".to_string())
        );
    }

    print_summary(&summary);

    if let Some(path) = &args.summary_json {
        if let Err(e) = write_summary(path, &summary) {
            error!("Failed to write summary to {}: {:#}", path.display(), e);
        } else {
            info!("Summary written to {}", path.display());
        }
    }

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!(
        "Processed {} file(s): {} succeeded, {} failed",
        summary.total, summary.succeeded, summary.failed
    );
    for record in summary.failures() {
        if let Some(reason) = record.outcome.failure_reason() {
            println!("  failed: {} ({})", record.item, reason);
        }
    }
}

fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)?;
    Ok(())
}
