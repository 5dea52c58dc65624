//! Mock worker launcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use crate::discovery::WorkItem;
use crate::worker::{
    OutputLine, WorkerError, WorkerExit, WorkerInvocation, WorkerLauncher, LINE_BUFFER,
};

/// How a scripted worker ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedExit {
    /// Exits with this code.
    Code(i32),
    /// Killed by a signal, no exit code.
    Signal(i32),
    /// Never starts: program missing.
    NotFound,
    /// Never starts: other spawn error.
    LaunchError(String),
}

/// Scripted behaviour for one worker.
#[derive(Debug, Clone)]
pub struct ScriptedWorker {
    pub lines: Vec<OutputLine>,
    pub exit: ScriptedExit,
    pub duration: Duration,
}

impl ScriptedWorker {
    pub fn succeed() -> Self {
        Self::exit(0)
    }

    pub fn exit(code: i32) -> Self {
        Self {
            lines: Vec::new(),
            exit: ScriptedExit::Code(code),
            duration: Duration::ZERO,
        }
    }

    pub fn signal(signal: i32) -> Self {
        Self {
            exit: ScriptedExit::Signal(signal),
            ..Self::succeed()
        }
    }

    pub fn not_found() -> Self {
        Self {
            exit: ScriptedExit::NotFound,
            ..Self::succeed()
        }
    }

    pub fn launch_error(message: impl Into<String>) -> Self {
        Self {
            exit: ScriptedExit::LaunchError(message.into()),
            ..Self::succeed()
        }
    }

    pub fn with_line(mut self, line: OutputLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Simulated run time before the worker exits.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// A recorded launch attempt for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedLaunch {
    pub item: WorkItem,
    pub exit: ScriptedExit,
    /// When the launch was requested.
    pub started: Instant,
    /// When the worker reported its exit; equals `started` for launch failures.
    pub finished: Option<Instant>,
}

/// Mock implementation of the WorkerLauncher trait.
///
/// Provides controllable behavior for testing:
/// - Script exit codes, signals and launch failures per path
/// - Script output lines and run time
/// - Record every launch with start/finish instants
/// - Track the peak number of simultaneously live workers
#[derive(Debug, Clone)]
pub struct MockLauncher {
    scripts: Arc<Mutex<HashMap<PathBuf, ScriptedWorker>>>,
    default_worker: Arc<Mutex<ScriptedWorker>>,
    launches: Arc<Mutex<Vec<RecordedLaunch>>>,
    live: Arc<AtomicUsize>,
    peak_live: Arc<AtomicUsize>,
}

impl Default for MockLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLauncher {
    /// Create a mock launcher whose workers succeed immediately.
    pub fn new() -> Self {
        Self {
            scripts: Arc::new(Mutex::new(HashMap::new())),
            default_worker: Arc::new(Mutex::new(ScriptedWorker::succeed())),
            launches: Arc::new(Mutex::new(Vec::new())),
            live: Arc::new(AtomicUsize::new(0)),
            peak_live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Script the worker for a specific path.
    pub fn script(&self, path: impl AsRef<Path>, worker: ScriptedWorker) {
        if let Ok(mut scripts) = self.scripts.lock() {
            scripts.insert(path.as_ref().to_path_buf(), worker);
        }
    }

    /// Script the worker used for unscripted paths.
    pub fn set_default(&self, worker: ScriptedWorker) {
        if let Ok(mut default_worker) = self.default_worker.lock() {
            *default_worker = worker;
        }
    }

    /// Get all recorded launches, in launch order.
    pub fn recorded_launches(&self) -> Vec<RecordedLaunch> {
        self.launches.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn launch_count(&self) -> usize {
        self.launches.lock().map(|l| l.len()).unwrap_or_default()
    }

    /// Number of launches for one path.
    pub fn launches_of(&self, path: impl AsRef<Path>) -> usize {
        self.recorded_launches()
            .iter()
            .filter(|l| l.item.path() == path.as_ref())
            .count()
    }

    /// Highest number of workers alive at the same time.
    pub fn peak_live(&self) -> usize {
        self.peak_live.load(Ordering::SeqCst)
    }

    fn worker_for(&self, item: &WorkItem) -> ScriptedWorker {
        let scripted = self
            .scripts
            .lock()
            .ok()
            .and_then(|s| s.get(item.path()).cloned());
        match scripted {
            Some(worker) => worker,
            None => self
                .default_worker
                .lock()
                .map(|w| w.clone())
                .unwrap_or_else(|_| ScriptedWorker::succeed()),
        }
    }

    fn record(&self, launch: RecordedLaunch) -> usize {
        let mut launches = self.launches.lock().unwrap_or_else(|e| e.into_inner());
        launches.push(launch);
        launches.len() - 1
    }
}

#[async_trait]
impl WorkerLauncher for MockLauncher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn launch(&self, item: &WorkItem) -> Result<WorkerInvocation, WorkerError> {
        let worker = self.worker_for(item);
        let started = Instant::now();

        let exit = match &worker.exit {
            ScriptedExit::Code(code) => WorkerExit::from_code(*code),
            ScriptedExit::Signal(signal) => WorkerExit {
                code: None,
                signal: Some(*signal),
            },
            ScriptedExit::NotFound | ScriptedExit::LaunchError(_) => {
                self.record(RecordedLaunch {
                    item: item.clone(),
                    exit: worker.exit.clone(),
                    started,
                    finished: Some(started),
                });
                return Err(match worker.exit.clone() {
                    ScriptedExit::LaunchError(message) => WorkerError::Launch {
                        program: PathBuf::from("mock-worker"),
                        source: std::io::Error::other(message),
                    },
                    _ => WorkerError::ProgramNotFound {
                        program: PathBuf::from("mock-worker"),
                    },
                });
            }
        };

        let index = self.record(RecordedLaunch {
            item: item.clone(),
            exit: worker.exit.clone(),
            started,
            finished: None,
        });

        let now_live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_live.fetch_max(now_live, Ordering::SeqCst);

        let (line_tx, line_rx) = mpsc::channel(LINE_BUFFER);
        let (exit_tx, exit_rx) = oneshot::channel();
        let launches = Arc::clone(&self.launches);
        let live = Arc::clone(&self.live);

        tokio::spawn(async move {
            for line in worker.lines {
                if line_tx.send(line).await.is_err() {
                    break;
                }
            }
            if !worker.duration.is_zero() {
                tokio::time::sleep(worker.duration).await;
            }
            drop(line_tx);

            if let Ok(mut launches) = launches.lock() {
                if let Some(launch) = launches.get_mut(index) {
                    launch.finished = Some(Instant::now());
                }
            }
            live.fetch_sub(1, Ordering::SeqCst);
            let _ = exit_tx.send(Ok(exit));
        });

        Ok(WorkerInvocation::from_channels(item.clone(), line_rx, exit_rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_exit_code() {
        let launcher = MockLauncher::new();
        let item = WorkItem::new("/data/a.opus").unwrap();
        launcher.script(item.path(), ScriptedWorker::exit(4));

        let invocation = launcher.launch(&item).await.unwrap();
        let exit = invocation.wait().await.unwrap();

        assert_eq!(exit.code, Some(4));
        assert_eq!(launcher.launch_count(), 1);
        assert!(launcher.recorded_launches()[0].finished.is_some());
    }

    #[tokio::test]
    async fn test_scripted_launch_failure() {
        let launcher = MockLauncher::new();
        launcher.set_default(ScriptedWorker::not_found());
        let item = WorkItem::new("/data/a.opus").unwrap();

        let err = launcher.launch(&item).await.unwrap_err();
        assert!(err.is_launch_failure());
        assert_eq!(launcher.launches_of("/data/a.opus"), 1);
        assert_eq!(launcher.peak_live(), 0);
    }
}
