//! Configuration for the worker process.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::error::WorkerError;

/// Subcommand of the current executable that processes one file.
pub const WORKER_SUBCOMMAND: &str = "process";

/// Configuration for launching worker processes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Program to run. When unset, the current executable is re-invoked
    /// with the `process` subcommand.
    #[serde(default)]
    pub program: Option<PathBuf>,

    /// Arguments placed before the item path.
    #[serde(default)]
    pub args: Vec<String>,

    /// Extra environment variables for the worker.
    #[serde(default)]
    pub envs: BTreeMap<String, String>,

    /// Whether the worker inherits the orchestrator's environment.
    #[serde(default = "default_inherit_env")]
    pub inherit_env: bool,
}

fn default_inherit_env() -> bool {
    true
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            program: None,
            args: Vec::new(),
            envs: BTreeMap::new(),
            inherit_env: default_inherit_env(),
        }
    }
}

impl WorkerConfig {
    /// Creates a config for an explicit program.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: Some(program.into()),
            ..Default::default()
        }
    }

    /// Appends an argument placed before the item path.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Sets an environment variable for the worker.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.insert(key.into(), value.into());
        self
    }

    /// Resolves the program and leading arguments.
    pub fn command(&self) -> Result<(PathBuf, Vec<String>), WorkerError> {
        match &self.program {
            Some(program) => Ok((program.clone(), self.args.clone())),
            None => {
                let exe = std::env::current_exe().map_err(|source| WorkerError::Launch {
                    program: PathBuf::from("<current executable>"),
                    source,
                })?;
                let mut args = vec![WORKER_SUBCOMMAND.to_string()];
                args.extend(self.args.iter().cloned());
                Ok((exe, args))
            }
        }
    }
}
