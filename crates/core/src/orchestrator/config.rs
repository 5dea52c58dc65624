//! Orchestrator configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the batch orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Delay between one item finishing and the next starting (milliseconds).
    /// Applied after failures too; never applied after the last item.
    #[serde(default = "default_pacing_interval")]
    pub pacing_interval_ms: u64,

    /// Pass worker stdout/stderr through to the console.
    /// When disabled, output is still drained but not shown.
    #[serde(default = "default_echo")]
    pub echo_worker_output: bool,
}

fn default_pacing_interval() -> u64 {
    5000 // 5 seconds
}

fn default_echo() -> bool {
    true
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            pacing_interval_ms: default_pacing_interval(),
            echo_worker_output: default_echo(),
        }
    }
}

impl OrchestratorConfig {
    /// Sets the pacing interval.
    pub fn with_pacing_interval(mut self, interval: Duration) -> Self {
        self.pacing_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn pacing_interval(&self) -> Duration {
        Duration::from_millis(self.pacing_interval_ms)
    }
}
