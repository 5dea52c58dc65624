//! Batch orchestrator implementation.
//!
//! Drives one worker per item, strictly in manifest order:
//! - Launch: at most one worker alive at any time
//! - Drain: worker output is passed through line by line while it runs
//! - Pace: fixed delay before the next item, skipped after the last

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::discovery::{discover, DiscoveryConfig, RunManifest, WorkItem};
use crate::worker::WorkerLauncher;

use super::config::OrchestratorConfig;
use super::sink::{ConsoleSink, OutputSink};
use super::types::{
    BatchEvent, FailureReason, ItemOutcome, OrchestratorError, OutcomeRecord, RunSummary,
};

/// Callback invoked for every progress marker of a run.
pub type BatchEventCallback = Arc<dyn Fn(&BatchEvent) + Send + Sync>;

/// The batch orchestrator - runs one worker per item, in order, with pacing.
pub struct BatchOrchestrator<L: WorkerLauncher> {
    config: OrchestratorConfig,
    launcher: Arc<L>,
    sink: Arc<dyn OutputSink>,
    on_event: Option<BatchEventCallback>,
}

impl<L: WorkerLauncher> BatchOrchestrator<L> {
    /// Create a new orchestrator writing worker output to the console.
    pub fn new(config: OrchestratorConfig, launcher: L) -> Self {
        Self {
            config,
            launcher: Arc::new(launcher),
            sink: Arc::new(ConsoleSink),
            on_event: None,
        }
    }

    /// Redirect passed-through worker output.
    pub fn with_output_sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Observe progress markers.
    pub fn with_event_callback(mut self, callback: BatchEventCallback) -> Self {
        self.on_event = Some(callback);
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Discover items, then process them.
    ///
    /// Only startup failures are returned as errors; item failures end up in
    /// the summary.
    pub async fn run(&self, discovery: &DiscoveryConfig) -> Result<RunSummary, OrchestratorError> {
        let discovery = discovery.clone();
        let manifest = tokio::task::spawn_blocking(move || discover(&discovery))
            .await
            .map_err(|e| OrchestratorError::DiscoveryTask(e.to_string()))??;

        Ok(self.run_batch(&manifest).await)
    }

    /// Process every item of the manifest and return the final accounting.
    pub async fn run_batch(&self, manifest: &RunManifest) -> RunSummary {
        let total = manifest.len();
        let mut summary = RunSummary::new(total);

        self.emit(BatchEvent::RunStarted {
            run_id: summary.run_id,
            total,
        });

        if manifest.is_empty() {
            warn!("No work items found, nothing to process");
            return self.finish(summary);
        }

        info!(
            run_id = %summary.run_id,
            total,
            "Starting batch of {} item(s) using {} launcher",
            total,
            self.launcher.name()
        );

        let pacing = self.config.pacing_interval();

        for (index, item) in manifest.iter().enumerate() {
            let position = index + 1;

            info!(
                position,
                total,
                item = %item,
                "[{}/{}] Processing {}",
                position,
                total,
                item.file_name()
            );
            self.emit(BatchEvent::ItemStarted {
                position,
                total,
                item: item.clone(),
            });

            let started_at = Utc::now();
            let outcome = self.process_item(item).await;
            let finished_at = Utc::now();

            match &outcome {
                ItemOutcome::Succeeded => {
                    info!(position, total, "[{}/{}] Succeeded: {}", position, total, item.file_name());
                }
                ItemOutcome::Failed { reason } => {
                    error!(
                        position,
                        total,
                        item = %item,
                        reason = %reason,
                        "[{}/{}] Failed: {}",
                        position,
                        total,
                        item.file_name()
                    );
                    if position < total {
                        info!("Continuing with the next item");
                    }
                }
            }

            summary.record(OutcomeRecord {
                position,
                item: item.clone(),
                outcome: outcome.clone(),
                started_at,
                finished_at,
            });
            self.emit(BatchEvent::ItemFinished {
                position,
                total,
                item: item.clone(),
                outcome,
            });

            if position < total && !pacing.is_zero() {
                info!("Waiting {:?} before the next item", pacing);
                self.emit(BatchEvent::Pacing { delay: pacing });
                tokio::time::sleep(pacing).await;
            }
        }

        self.finish(summary)
    }

    /// Runs one worker to completion: launch, drain, wait, classify.
    async fn process_item(&self, item: &WorkItem) -> ItemOutcome {
        let mut invocation = match self.launcher.launch(item).await {
            Ok(invocation) => invocation,
            Err(e) => {
                warn!("Could not start worker for {}: {}", item.file_name(), e);
                return ItemOutcome::failed(FailureReason::from(&e));
            }
        };

        let mut lines = 0usize;
        while let Some(line) = invocation.next_line().await {
            lines += 1;
            if self.config.echo_worker_output {
                self.sink.write_line(&line);
            }
        }

        match invocation.wait().await {
            Ok(exit) => {
                debug!("Worker for {} ended with {} after {} line(s)", item.file_name(), exit, lines);
                ItemOutcome::from(exit)
            }
            Err(e) => ItemOutcome::failed(FailureReason::from(&e)),
        }
    }

    fn finish(&self, mut summary: RunSummary) -> RunSummary {
        summary.finish();
        info!(
            run_id = %summary.run_id,
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "All items processed: {} succeeded, {} failed",
            summary.succeeded,
            summary.failed
        );
        self.emit(BatchEvent::RunFinished {
            summary: summary.clone(),
        });
        summary
    }

    fn emit(&self, event: BatchEvent) {
        if let Some(callback) = &self.on_event {
            callback(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemorySink, MockLauncher, ScriptedWorker};
    use crate::worker::OutputLine;
    use std::sync::Mutex;
    use std::time::Duration;

    fn manifest(names: &[&str]) -> RunManifest {
        names
            .iter()
            .map(|n| WorkItem::new(format!("/data/{}", n)).unwrap())
            .collect()
    }

    fn orchestrator(launcher: MockLauncher) -> BatchOrchestrator<MockLauncher> {
        BatchOrchestrator::new(
            OrchestratorConfig::default().with_pacing_interval(Duration::ZERO),
            launcher,
        )
        .with_output_sink(Arc::new(MemorySink::new()))
    }

    #[tokio::test]
    async fn test_empty_manifest_launches_nothing() {
        let launcher = MockLauncher::new();
        let orchestrator = orchestrator(launcher.clone());

        let summary = orchestrator.run_batch(&RunManifest::default()).await;

        assert_eq!(summary.total, 0);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.failed, 0);
        assert!(summary.outcomes.is_empty());
        assert_eq!(launcher.launch_count(), 0);
    }

    #[tokio::test]
    async fn test_events_in_order() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&events);
        let launcher = MockLauncher::new();
        launcher.script("/data/b.opus", ScriptedWorker::exit(1));

        let callback: BatchEventCallback = Arc::new(move |event: &BatchEvent| {
            let label = match event {
                BatchEvent::RunStarted { total, .. } => format!("run:{}", total),
                BatchEvent::ItemStarted { position, .. } => format!("start:{}", position),
                BatchEvent::ItemFinished {
                    position, outcome, ..
                } => format!("end:{}:{}", position, outcome.is_success()),
                BatchEvent::Pacing { .. } => "pace".to_string(),
                BatchEvent::RunFinished { summary } => format!("done:{}", summary.failed),
            };
            recorded.lock().unwrap().push(label);
        });
        let orchestrator = orchestrator(launcher).with_event_callback(callback);

        orchestrator
            .run_batch(&manifest(&["a.opus", "b.opus"]))
            .await;

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "run:2",
                "start:1",
                "end:1:true",
                "start:2",
                "end:2:false",
                "done:1"
            ]
        );
    }

    #[tokio::test]
    async fn test_output_passthrough_preserves_streams() {
        let launcher = MockLauncher::new();
        launcher.script(
            "/data/a.opus",
            ScriptedWorker::succeed()
                .with_line(OutputLine::stdout("uploading"))
                .with_line(OutputLine::stderr("warning: large file")),
        );
        let sink = Arc::new(MemorySink::new());
        let orchestrator = BatchOrchestrator::new(OrchestratorConfig::default(), launcher)
            .with_output_sink(sink.clone());

        orchestrator.run_batch(&manifest(&["a.opus"])).await;

        assert_eq!(
            sink.lines(),
            vec![
                OutputLine::stdout("uploading"),
                OutputLine::stderr("warning: large file")
            ]
        );
    }

    #[tokio::test]
    async fn test_echo_disabled_still_completes() {
        let launcher = MockLauncher::new();
        launcher.script(
            "/data/a.opus",
            ScriptedWorker::succeed().with_line(OutputLine::stdout("hidden")),
        );
        let sink = Arc::new(MemorySink::new());
        let config = OrchestratorConfig {
            echo_worker_output: false,
            ..Default::default()
        };
        let orchestrator =
            BatchOrchestrator::new(config, launcher).with_output_sink(sink.clone());

        let summary = orchestrator.run_batch(&manifest(&["a.opus"])).await;

        assert_eq!(summary.succeeded, 1);
        assert!(sink.lines().is_empty());
    }
}
