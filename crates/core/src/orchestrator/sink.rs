//! Destinations for passed-through worker output.

use std::io::Write;

use crate::worker::{OutputLine, OutputStream};

/// Receives worker output lines as they are produced.
pub trait OutputSink: Send + Sync {
    fn write_line(&self, line: &OutputLine);
}

/// Writes worker stdout to our stdout and worker stderr to our stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn write_line(&self, line: &OutputLine) {
        // console write failures (closed pipe) are not item failures
        match line.stream {
            OutputStream::Stdout => {
                let mut out = std::io::stdout().lock();
                let _ = writeln!(out, "{}", line.text);
                let _ = out.flush();
            }
            OutputStream::Stderr => {
                let mut err = std::io::stderr().lock();
                let _ = writeln!(err, "{}", line.text);
            }
        }
    }
}
