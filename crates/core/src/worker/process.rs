//! OS process worker implementation.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::discovery::WorkItem;

use super::config::WorkerConfig;
use super::error::WorkerError;
use super::invocation::{WorkerInvocation, LINE_BUFFER};
use super::traits::WorkerLauncher;
use super::types::{OutputLine, OutputStream, WorkerExit};

/// Launches each worker as a child process.
///
/// The item path is appended as the final argument. stdin is closed, stdout
/// and stderr are piped and read line by line while the child runs.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    program: PathBuf,
    args: Vec<String>,
    config: WorkerConfig,
}

impl ProcessLauncher {
    /// Creates a launcher, resolving the worker program once.
    pub fn new(config: WorkerConfig) -> Result<Self, WorkerError> {
        let (program, args) = config.command()?;
        Ok(Self {
            program,
            args,
            config,
        })
    }

    /// The resolved worker program.
    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    fn build_command(&self, item: &WorkItem) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(item.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if !self.config.inherit_env {
            command.env_clear();
        }
        command.envs(&self.config.envs);
        command
    }
}

#[async_trait]
impl WorkerLauncher for ProcessLauncher {
    fn name(&self) -> &str {
        "process"
    }

    async fn launch(&self, item: &WorkItem) -> Result<WorkerInvocation, WorkerError> {
        let mut child = self.build_command(item).spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                WorkerError::ProgramNotFound {
                    program: self.program.clone(),
                }
            } else {
                WorkerError::Launch {
                    program: self.program.clone(),
                    source: e,
                }
            }
        })?;

        debug!(
            "Started worker pid={:?} for {}",
            child.id(),
            item.file_name()
        );

        let (line_tx, line_rx) = mpsc::channel(LINE_BUFFER);
        let (exit_tx, exit_rx) = oneshot::channel();

        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(spawn_reader(stdout, OutputStream::Stdout, line_tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(spawn_reader(stderr, OutputStream::Stderr, line_tx.clone()));
        }
        // only the readers keep the line channel open
        drop(line_tx);

        tokio::spawn(async move {
            let status = child.wait().await;
            for reader in readers {
                let _ = reader.await;
            }
            let result = status.map(WorkerExit::from).map_err(WorkerError::Io);
            let _ = exit_tx.send(result);
        });

        Ok(WorkerInvocation::from_channels(item.clone(), line_rx, exit_rx))
    }
}

/// Forwards newline-delimited segments of one stream as they arrive.
///
/// Keeps reading to EOF even if the consumer went away, so the child never
/// blocks on a full pipe.
fn spawn_reader<R>(
    reader: R,
    stream: OutputStream,
    tx: mpsc::Sender<OutputLine>,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut segments = BufReader::new(reader).split(b'\n');
        let mut forwarding = true;

        loop {
            match segments.next_segment().await {
                Ok(Some(bytes)) => {
                    if forwarding && tx.send(OutputLine::from_bytes(stream, &bytes)).await.is_err()
                    {
                        forwarding = false;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed reading worker {:?}: {}", stream, e);
                    break;
                }
            }
        }
    })
}
