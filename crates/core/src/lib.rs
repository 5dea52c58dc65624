pub mod config;
pub mod discovery;
pub mod notes;
pub mod orchestrator;
pub mod testing;
pub mod worker;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use discovery::{discover, DiscoveryConfig, DiscoveryError, GlobPattern, RunManifest, WorkItem};
pub use notes::{
    output_path_for, ContentGenerator, GeminiClient, GeminiConfig, NoteProcessor, NotesError,
};
pub use orchestrator::{
    BatchEvent, BatchEventCallback, BatchOrchestrator, ConsoleSink, FailureReason, ItemOutcome,
    OrchestratorConfig, OrchestratorError, OutcomeRecord, OutputSink, RunSummary,
};
pub use worker::{
    OutputLine, OutputStream, ProcessLauncher, WorkerConfig, WorkerError, WorkerExit,
    WorkerInvocation, WorkerLauncher,
};
