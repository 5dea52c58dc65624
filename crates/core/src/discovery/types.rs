//! Types for discovered work.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use super::error::DiscoveryError;

/// One unit of work: the absolute path of an input file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkItem(PathBuf);

impl WorkItem {
    /// Creates a work item, rejecting relative paths.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, DiscoveryError> {
        let path = path.into();
        if !path.is_absolute() {
            return Err(DiscoveryError::RelativePath { path });
        }
        Ok(Self(path))
    }

    /// The absolute path of the item.
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// The final path component, for log lines.
    pub fn file_name(&self) -> String {
        self.0
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.0.display().to_string())
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for WorkItem {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// The ordered, fixed list of items for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunManifest {
    items: Vec<WorkItem>,
}

impl RunManifest {
    pub fn new(items: Vec<WorkItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WorkItem> {
        self.items.iter()
    }

    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }
}

impl<'a> IntoIterator for &'a RunManifest {
    type Item = &'a WorkItem;
    type IntoIter = std::slice::Iter<'a, WorkItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<WorkItem> for RunManifest {
    fn from_iter<I: IntoIterator<Item = WorkItem>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
