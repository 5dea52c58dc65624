//! Testing utilities and mock implementations.
//!
//! Mocks for the worker launcher, the output sink and the content generator,
//! so orchestration and note processing can be exercised without spawning
//! real workers or calling the remote service.
//!
//! # Example
//!
//! ```rust,ignore
//! use notebatch_core::testing::{MockLauncher, ScriptedWorker};
//!
//! let launcher = MockLauncher::new();
//! launcher.script("/data/b.opus", ScriptedWorker::exit(1));
//!
//! let summary = BatchOrchestrator::new(config, launcher.clone())
//!     .run_batch(&manifest)
//!     .await;
//! assert_eq!(launcher.launch_count(), manifest.len());
//! ```

mod mock_generator;
mod mock_launcher;
mod sink;

pub use mock_generator::MockGenerator;
pub use mock_launcher::{MockLauncher, RecordedLaunch, ScriptedExit, ScriptedWorker};
pub use sink::MemorySink;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::Path;

    use crate::discovery::{RunManifest, WorkItem};

    /// Build a manifest of absolute items under `root`.
    pub fn manifest_under(root: &Path, names: &[&str]) -> RunManifest {
        names
            .iter()
            .map(|name| WorkItem::new(root.join(name)).expect("root must be absolute"))
            .collect()
    }

    /// Build a manifest of items under `/data`.
    pub fn manifest(names: &[&str]) -> RunManifest {
        manifest_under(Path::new("/data"), names)
    }
}
