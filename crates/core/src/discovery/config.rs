//! Configuration for the discovery module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for work item discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Root directory to scan. Defaults to the current working directory.
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Glob pattern matched against paths relative to the root.
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Directory names whose subtrees are never entered, at any depth.
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,

    /// Whether to follow symbolic links while walking.
    #[serde(default)]
    pub follow_links: bool,

    /// Whether entries whose name starts with a dot are considered.
    #[serde(default)]
    pub include_hidden: bool,
}

fn default_pattern() -> String {
    "**/*.opus".to_string()
}

fn default_ignore() -> Vec<String> {
    vec!["node_modules".to_string()]
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            root: None,
            pattern: default_pattern(),
            ignore: default_ignore(),
            follow_links: false,
            include_hidden: false,
        }
    }
}

impl DiscoveryConfig {
    /// Sets the root directory.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Sets the glob pattern.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Adds a directory name to the ignore list.
    pub fn with_ignored(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.ignore.contains(&name) {
            self.ignore.push(name);
        }
        self
    }

    /// Whether a directory with this name must be pruned.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore.iter().any(|ignored| ignored == name)
    }
}
