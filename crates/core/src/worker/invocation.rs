//! A live worker bound to one work item.

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::discovery::WorkItem;

use super::error::WorkerError;
use super::types::{OutputLine, WorkerExit};

/// Capacity of the line channel between stream readers and the consumer.
pub const LINE_BUFFER: usize = 256;

pub type LineReceiver = mpsc::Receiver<OutputLine>;
pub type ExitReceiver = oneshot::Receiver<Result<WorkerExit, WorkerError>>;

/// A running worker: a lazy, finite, non-restartable sequence of output
/// lines followed by one terminal exit status.
///
/// The line sequence ends once both output streams are closed.
#[derive(Debug)]
pub struct WorkerInvocation {
    item: WorkItem,
    lines: LineReceiver,
    exit: ExitReceiver,
}

impl WorkerInvocation {
    /// Assembles an invocation from its line and exit channels.
    ///
    /// Launchers own the sending halves; the line channel must close when the
    /// worker's output is exhausted.
    pub fn from_channels(item: WorkItem, lines: LineReceiver, exit: ExitReceiver) -> Self {
        Self { item, lines, exit }
    }

    /// The item this worker is processing.
    pub fn item(&self) -> &WorkItem {
        &self.item
    }

    /// Next output line, or `None` once the worker's output is exhausted.
    pub async fn next_line(&mut self) -> Option<OutputLine> {
        self.lines.recv().await
    }

    /// Awaits termination, discarding any lines not yet read.
    pub async fn wait(mut self) -> Result<WorkerExit, WorkerError> {
        let mut discarded = 0usize;
        while self.lines.recv().await.is_some() {
            discarded += 1;
        }
        if discarded > 0 {
            debug!("Discarded {} unread line(s) from {}", discarded, self.item);
        }

        match self.exit.await {
            Ok(result) => result,
            Err(_) => Err(WorkerError::Aborted),
        }
    }
}
