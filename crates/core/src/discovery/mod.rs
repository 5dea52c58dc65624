//! Discovery of work items in a directory tree.
//!
//! Walks a root directory, prunes ignored subtrees (e.g. `node_modules`) and
//! returns the absolute paths of every file matching a glob pattern, in a
//! deterministic order.
//!
//! # Example
//!
//! ```ignore
//! use notebatch_core::discovery::{discover, DiscoveryConfig};
//!
//! let config = DiscoveryConfig::default().with_root("/data/lessons");
//! let manifest = discover(&config)?;
//! for item in manifest.iter() {
//!     println!("{}", item);
//! }
//! ```

mod config;
mod error;
mod pattern;
mod scanner;
mod types;

pub use config::DiscoveryConfig;
pub use error::DiscoveryError;
pub use pattern::GlobPattern;
pub use scanner::{discover, discover_in};
pub use types::{RunManifest, WorkItem};
