//! Types for the batch orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::discovery::{DiscoveryError, WorkItem};
use crate::worker::{WorkerError, WorkerExit};

/// Errors that abort a run before any item is attempted.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Discovery or the environment was unusable.
    #[error("startup failed: {0}")]
    Startup(#[from] DiscoveryError),

    /// The discovery task itself did not complete.
    #[error("discovery task failed: {0}")]
    DiscoveryTask(String),
}

/// Why an item failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// The worker could not be started.
    LaunchFailed { message: String },
    /// The worker exited with a non-zero code.
    ExitCode { code: i32 },
    /// The worker ended without an exit code.
    Terminated { signal: Option<i32> },
    /// Reading the worker's output or status failed after it started.
    Io { message: String },
}

impl FailureReason {
    pub fn is_launch_failure(&self) -> bool {
        matches!(self, Self::LaunchFailed { .. })
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LaunchFailed { message } => write!(f, "failed to launch: {}", message),
            Self::ExitCode { code } => write!(f, "abnormal exit code {}", code),
            Self::Terminated { signal: Some(signal) } => {
                write!(f, "terminated by signal {}", signal)
            }
            Self::Terminated { signal: None } => write!(f, "terminated without exit code"),
            Self::Io { message } => write!(f, "worker I/O failure: {}", message),
        }
    }
}

impl From<&WorkerError> for FailureReason {
    fn from(error: &WorkerError) -> Self {
        if error.is_launch_failure() {
            Self::LaunchFailed {
                message: error.to_string(),
            }
        } else {
            Self::Io {
                message: error.to_string(),
            }
        }
    }
}

/// Result of processing one item. Final once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Succeeded,
    Failed { reason: FailureReason },
}

impl ItemOutcome {
    pub fn failed(reason: FailureReason) -> Self {
        Self::Failed { reason }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    pub fn failure_reason(&self) -> Option<&FailureReason> {
        match self {
            Self::Succeeded => None,
            Self::Failed { reason } => Some(reason),
        }
    }
}

impl From<WorkerExit> for ItemOutcome {
    fn from(exit: WorkerExit) -> Self {
        match exit.code {
            Some(0) => Self::Succeeded,
            Some(code) => Self::failed(FailureReason::ExitCode { code }),
            None => Self::failed(FailureReason::Terminated {
                signal: exit.signal,
            }),
        }
    }
}

/// One entry of the ordered outcome log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeRecord {
    /// 1-based position in the run manifest.
    pub position: usize,
    pub item: WorkItem,
    pub outcome: ItemOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Aggregate accounting for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<OutcomeRecord>,
}

impl RunSummary {
    /// Starts accounting for a run of `total` items.
    pub fn new(total: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            total,
            succeeded: 0,
            failed: 0,
            outcomes: Vec::with_capacity(total),
        }
    }

    /// Appends an outcome. Records are never revised.
    pub fn record(&mut self, record: OutcomeRecord) {
        debug_assert!(self.outcomes.len() < self.total, "more outcomes than items");
        if record.outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.outcomes.push(record);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Number of items with a recorded outcome.
    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn is_complete(&self) -> bool {
        self.processed() == self.total
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Failed records in input order.
    pub fn failures(&self) -> impl Iterator<Item = &OutcomeRecord> {
        self.outcomes.iter().filter(|r| !r.outcome.is_success())
    }
}

/// Structured progress markers emitted during a run.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    RunStarted {
        run_id: Uuid,
        total: usize,
    },
    ItemStarted {
        position: usize,
        total: usize,
        item: WorkItem,
    },
    ItemFinished {
        position: usize,
        total: usize,
        item: WorkItem,
        outcome: ItemOutcome,
    },
    Pacing {
        delay: Duration,
    },
    RunFinished {
        summary: RunSummary,
    },
}
