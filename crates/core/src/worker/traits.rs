//! Trait definitions for the worker module.

use async_trait::async_trait;

use crate::discovery::WorkItem;

use super::error::WorkerError;
use super::invocation::WorkerInvocation;

/// Something that can start an isolated worker for one item.
#[async_trait]
pub trait WorkerLauncher: Send + Sync {
    /// Returns the name of this launcher implementation.
    fn name(&self) -> &str;

    /// Starts a worker bound to `item`.
    ///
    /// An `Err` means the worker never started.
    async fn launch(&self, item: &WorkItem) -> Result<WorkerInvocation, WorkerError>;
}
