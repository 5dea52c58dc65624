//! Worker invocation for a single work item.
//!
//! A worker is an isolated OS process given the absolute path of one item as
//! its last argument. Its stdout/stderr are exposed as a lazy, finite sequence
//! of lines while it runs, followed by exactly one exit status.
//!
//! # Example
//!
//! ```ignore
//! use notebatch_core::worker::{ProcessLauncher, WorkerConfig, WorkerLauncher};
//!
//! let launcher = ProcessLauncher::new(WorkerConfig::default())?;
//! let mut invocation = launcher.launch(&item).await?;
//! while let Some(line) = invocation.next_line().await {
//!     println!("{}", line.text);
//! }
//! let exit = invocation.wait().await?;
//! assert!(exit.success());
//! ```

mod config;
mod error;
mod invocation;
mod process;
mod traits;
mod types;

pub use config::{WorkerConfig, WORKER_SUBCOMMAND};
pub use error::WorkerError;
pub use invocation::{ExitReceiver, LineReceiver, WorkerInvocation, LINE_BUFFER};
pub use process::ProcessLauncher;
pub use traits::WorkerLauncher;
pub use types::{OutputLine, OutputStream, WorkerExit};
