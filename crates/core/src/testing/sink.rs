//! In-memory output sink.

use std::sync::{Arc, Mutex};

use crate::orchestrator::OutputSink;
use crate::worker::OutputLine;

/// Captures passed-through worker output for assertions.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<OutputLine>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured lines, in arrival order.
    pub fn lines(&self) -> Vec<OutputLine> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl OutputSink for MemorySink {
    fn write_line(&self, line: &OutputLine) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.clone());
        }
    }
}
