//! Batch orchestration integration tests.
//!
//! These tests drive complete runs through the orchestrator:
//! discover -> launch -> drain -> wait -> pace -> summarize

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;
use tokio::time::Instant;
use tokio_test::{assert_err, assert_ok};

use notebatch_core::{
    testing::{fixtures, MemorySink, MockLauncher, ScriptedWorker},
    BatchEvent, BatchOrchestrator, DiscoveryConfig, DiscoveryError, FailureReason, ItemOutcome,
    OrchestratorConfig, OrchestratorError, OutputLine, OutputStream, ProcessLauncher,
    WorkerConfig,
};

const PACING: Duration = Duration::from_secs(5);

fn orchestrator(launcher: &MockLauncher) -> BatchOrchestrator<MockLauncher> {
    BatchOrchestrator::new(OrchestratorConfig::default(), launcher.clone())
        .with_output_sink(Arc::new(MemorySink::new()))
}

#[tokio::test(start_paused = true)]
async fn test_pacing_between_items_but_not_after_last() {
    let launcher = MockLauncher::new();
    launcher.set_default(ScriptedWorker::succeed().with_duration(Duration::from_secs(1)));
    let manifest = fixtures::manifest(&["a.opus", "b.opus", "c.opus"]);

    let start = Instant::now();
    let summary = orchestrator(&launcher).run_batch(&manifest).await;
    let elapsed = start.elapsed();

    assert_eq!(summary.succeeded, 3);

    let launches = launcher.recorded_launches();
    assert_eq!(launches.len(), 3);
    for pair in launches.windows(2) {
        let previous_end = pair[0].finished.expect("worker finished");
        assert!(
            pair[1].started.duration_since(previous_end) >= PACING,
            "next worker started {:?} after the previous ended",
            pair[1].started.duration_since(previous_end)
        );
    }

    // three 1s workers plus two pauses, nothing trailing
    assert!(elapsed >= Duration::from_secs(13));
    assert!(elapsed < Duration::from_secs(14), "elapsed {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_single_item_has_no_delay() {
    let launcher = MockLauncher::new();
    let manifest = fixtures::manifest(&["only.opus"]);

    let start = Instant::now();
    let summary = orchestrator(&launcher).run_batch(&manifest).await;

    assert_eq!(summary.total, 1);
    assert_eq!(summary.succeeded, 1);
    assert!(start.elapsed() < PACING);
}

#[tokio::test(start_paused = true)]
async fn test_pacing_applies_after_failures() {
    let launcher = MockLauncher::new();
    launcher.script("/data/a.opus", ScriptedWorker::not_found());
    let manifest = fixtures::manifest(&["a.opus", "b.opus"]);

    orchestrator(&launcher).run_batch(&manifest).await;

    let launches = launcher.recorded_launches();
    let gap = launches[1]
        .started
        .duration_since(launches[0].finished.expect("launch attempt recorded"));
    assert!(gap >= PACING);
}

#[tokio::test(start_paused = true)]
async fn test_failure_does_not_stop_the_batch() {
    let launcher = MockLauncher::new();
    launcher.script("/data/b.opus", ScriptedWorker::exit(1));
    let manifest = fixtures::manifest(&["a.opus", "b.opus", "c.opus"]);

    let summary = orchestrator(&launcher).run_batch(&manifest).await;

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert!(summary.is_complete());
    assert_eq!(launcher.launch_count(), 3);

    let positions: Vec<usize> = summary.outcomes.iter().map(|r| r.position).collect();
    assert_eq!(positions, vec![1, 2, 3]);
    assert_eq!(
        summary.outcomes[1].outcome,
        ItemOutcome::failed(FailureReason::ExitCode { code: 1 })
    );
}

#[tokio::test(start_paused = true)]
async fn test_items_run_in_manifest_order_one_at_a_time() {
    let launcher = MockLauncher::new();
    launcher.set_default(ScriptedWorker::succeed().with_duration(Duration::from_millis(300)));
    let manifest = fixtures::manifest(&["z.opus", "a.opus", "m.opus", "b.opus"]);

    orchestrator(&launcher).run_batch(&manifest).await;

    let launched: Vec<_> = launcher
        .recorded_launches()
        .into_iter()
        .map(|l| l.item)
        .collect();
    let expected: Vec<_> = manifest.iter().cloned().collect();
    assert_eq!(launched, expected);
    assert_eq!(launcher.peak_live(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_items_are_never_retried() {
    let launcher = MockLauncher::new();
    launcher.script("/data/a.opus", ScriptedWorker::exit(2));
    launcher.script("/data/b.opus", ScriptedWorker::launch_error("permission denied"));
    let manifest = fixtures::manifest(&["a.opus", "b.opus"]);

    let summary = orchestrator(&launcher).run_batch(&manifest).await;

    assert_eq!(summary.failed, 2);
    assert_eq!(launcher.launches_of("/data/a.opus"), 1);
    assert_eq!(launcher.launches_of("/data/b.opus"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_launch_and_exit_failures_are_distinguishable() {
    let launcher = MockLauncher::new();
    launcher.script("/data/missing.opus", ScriptedWorker::not_found());
    launcher.script("/data/crash.opus", ScriptedWorker::exit(101));
    launcher.script("/data/killed.opus", ScriptedWorker::signal(9));
    let manifest = fixtures::manifest(&["missing.opus", "crash.opus", "killed.opus"]);

    let summary = orchestrator(&launcher).run_batch(&manifest).await;

    let reasons: Vec<_> = summary
        .failures()
        .filter_map(|r| r.outcome.failure_reason().cloned())
        .collect();
    assert_eq!(reasons.len(), 3);
    assert!(reasons[0].is_launch_failure());
    assert_eq!(reasons[1], FailureReason::ExitCode { code: 101 });
    assert_eq!(reasons[2], FailureReason::Terminated { signal: Some(9) });
    assert!(!reasons[1].is_launch_failure());
}

#[tokio::test(start_paused = true)]
async fn test_events_report_progress() {
    let launcher = MockLauncher::new();
    launcher.script("/data/b.opus", ScriptedWorker::exit(4));
    let manifest = fixtures::manifest(&["a.opus", "b.opus"]);

    let events = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&events);
    let summary = orchestrator(&launcher)
        .with_event_callback(Arc::new(move |event: &BatchEvent| {
            let marker = match event {
                BatchEvent::RunStarted { total, .. } => format!("start {}", total),
                BatchEvent::ItemStarted { position, total, .. } => {
                    format!("item {}/{}", position, total)
                }
                BatchEvent::ItemFinished { position, outcome, .. } => {
                    format!("done {} {}", position, outcome.is_success())
                }
                BatchEvent::Pacing { delay } => format!("pace {}", delay.as_secs()),
                BatchEvent::RunFinished { summary } => {
                    format!("end {}/{}", summary.succeeded, summary.failed)
                }
            };
            recorded.lock().unwrap().push(marker);
        }))
        .run_batch(&manifest)
        .await;

    assert_eq!(summary.failed, 1);
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            "start 2",
            "item 1/2",
            "done 1 true",
            "pace 5",
            "item 2/2",
            "done 2 false",
            "end 1/1",
        ]
    );
}

#[tokio::test]
async fn test_worker_output_reaches_the_sink() {
    let launcher = MockLauncher::new();
    launcher.script(
        "/data/a.opus",
        ScriptedWorker::succeed()
            .with_line(OutputLine::stdout("uploading"))
            .with_line(OutputLine::stderr("file is large"))
            .with_line(OutputLine::stdout("saved")),
    );
    let manifest = fixtures::manifest(&["a.opus"]);
    let sink = Arc::new(MemorySink::new());

    BatchOrchestrator::new(OrchestratorConfig::default(), launcher.clone())
        .with_output_sink(sink.clone())
        .run_batch(&manifest)
        .await;

    let lines = sink.lines();
    let stdout: Vec<_> = lines
        .iter()
        .filter(|l| l.stream == OutputStream::Stdout)
        .map(|l| l.text.as_str())
        .collect();
    let stderr: Vec<_> = lines
        .iter()
        .filter(|l| l.stream == OutputStream::Stderr)
        .map(|l| l.text.as_str())
        .collect();
    assert_eq!(stdout, vec!["uploading", "saved"]);
    assert_eq!(stderr, vec!["file is large"]);
}

#[tokio::test]
async fn test_missing_root_is_a_startup_error() {
    let dir = TempDir::new().unwrap();
    let launcher = MockLauncher::new();
    let discovery = DiscoveryConfig::default().with_root(dir.path().join("missing"));

    let result = orchestrator(&launcher).run(&discovery).await;

    let err = assert_err!(result);
    assert!(matches!(
        err,
        OrchestratorError::Startup(DiscoveryError::RootNotFound { .. })
    ));
    assert_eq!(launcher.launch_count(), 0);
}

#[tokio::test]
async fn test_run_discovers_then_processes() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("unit1")).unwrap();
    std::fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
    std::fs::write(dir.path().join("unit1/a.opus"), b"").unwrap();
    std::fs::write(dir.path().join("b.opus"), b"").unwrap();
    std::fs::write(dir.path().join("notes.md"), b"").unwrap();
    std::fs::write(dir.path().join("node_modules/pkg/c.opus"), b"").unwrap();

    let launcher = MockLauncher::new();
    let discovery = DiscoveryConfig::default().with_root(dir.path());
    let orchestrator = BatchOrchestrator::new(
        OrchestratorConfig::default().with_pacing_interval(Duration::ZERO),
        launcher.clone(),
    )
    .with_output_sink(Arc::new(MemorySink::new()));

    let summary = assert_ok!(orchestrator.run(&discovery).await);

    assert_eq!(summary.total, 2);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(launcher.launches_of(dir.path().join("b.opus")), 1);
    assert_eq!(launcher.launches_of(dir.path().join("unit1/a.opus")), 1);
    assert_eq!(launcher.launches_of(dir.path().join("node_modules/pkg/c.opus")), 0);
}

#[tokio::test]
async fn test_empty_discovery_finishes_cleanly() {
    let dir = TempDir::new().unwrap();
    let launcher = MockLauncher::new();
    let discovery = DiscoveryConfig::default().with_root(dir.path());

    let summary = assert_ok!(orchestrator(&launcher).run(&discovery).await);

    assert_eq!(summary.total, 0);
    assert!(summary.finished_at.is_some());
    assert_eq!(launcher.launch_count(), 0);
}

#[cfg(unix)]
#[tokio::test]
async fn test_real_worker_processes() {
    let dir = TempDir::new().unwrap();
    for name in ["a.opus", "b_bad.opus", "c.opus"] {
        std::fs::write(dir.path().join(name), b"").unwrap();
    }

    let worker = WorkerConfig::with_program("sh")
        .with_arg("-c")
        .with_arg(
            "case \"$1\" in *bad*) echo \"no luck\" >&2; exit 5;; \
             *) echo \"wrote ${1%.opus}.md\"; : > \"${1%.opus}.md\";; esac",
        )
        .with_arg("worker");
    let launcher = ProcessLauncher::new(worker).unwrap();
    let sink = Arc::new(MemorySink::new());
    let orchestrator = BatchOrchestrator::new(
        OrchestratorConfig::default().with_pacing_interval(Duration::from_millis(10)),
        launcher,
    )
    .with_output_sink(sink.clone());

    let summary = orchestrator
        .run(&DiscoveryConfig::default().with_root(dir.path()))
        .await
        .unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(
        summary.outcomes[1].outcome,
        ItemOutcome::failed(FailureReason::ExitCode { code: 5 })
    );
    assert!(dir.path().join("a.md").exists());
    assert!(dir.path().join("c.md").exists());
    assert!(!dir.path().join("b_bad.md").exists());

    let texts: Vec<_> = sink.lines().into_iter().map(|l| l.text).collect();
    assert!(texts.iter().any(|t| t == "no luck"));
    assert_eq!(texts.iter().filter(|t| t.starts_with("wrote ")).count(), 2);
}
