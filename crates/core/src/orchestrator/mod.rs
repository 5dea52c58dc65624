//! Batch orchestrator for sequential, paced worker execution.
//!
//! The orchestrator drives one worker per discovered item:
//! - **Sequential**: exactly one worker is alive at any time
//! - **Paced**: a fixed delay separates consecutive items (skipped after the last)
//! - **Isolated**: a failing item is recorded and the run continues

mod config;
mod runner;
mod sink;
mod types;

pub use config::OrchestratorConfig;
pub use runner::{BatchEventCallback, BatchOrchestrator};
pub use sink::{ConsoleSink, OutputSink};
pub use types::{
    BatchEvent, FailureReason, ItemOutcome, OrchestratorError, OutcomeRecord, RunSummary,
};
