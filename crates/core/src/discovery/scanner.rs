//! Directory traversal.

use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use super::config::DiscoveryConfig;
use super::error::DiscoveryError;
use super::pattern::GlobPattern;
use super::types::{RunManifest, WorkItem};

/// Discovers work items under the configured root (or the current directory).
pub fn discover(config: &DiscoveryConfig) -> Result<RunManifest, DiscoveryError> {
    let root = match &config.root {
        Some(root) => std::path::absolute(root).map_err(DiscoveryError::WorkingDirectory)?,
        None => std::env::current_dir().map_err(DiscoveryError::WorkingDirectory)?,
    };
    discover_in(&root, config)
}

/// Discovers work items under an explicit absolute root, ignoring `config.root`.
///
/// Returns either the complete list or an error; a traversal failure anywhere
/// below the root discards everything found so far.
pub fn discover_in(root: &Path, config: &DiscoveryConfig) -> Result<RunManifest, DiscoveryError> {
    let pattern = GlobPattern::new(&config.pattern)?;

    if !root.exists() {
        return Err(DiscoveryError::RootNotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(DiscoveryError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    info!(
        "Scanning {} for '{}' (ignoring: {:?})",
        root.display(),
        pattern.as_str(),
        config.ignore
    );

    let walker = WalkDir::new(root)
        .follow_links(config.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| keep_entry(entry, config));

    let mut items = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| DiscoveryError::Walk {
            path: e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            reason: e.to_string(),
        })?;

        if !is_regular_file(&entry) {
            continue;
        }

        let relative = match entry.path().strip_prefix(root) {
            Ok(relative) => relative,
            Err(_) => continue,
        };

        if pattern.matches_path(relative) {
            debug!("Matched {}", entry.path().display());
            items.push(WorkItem::new(absolute_entry_path(root, entry.path()))?);
        }
    }

    info!("Discovered {} file(s)", items.len());
    Ok(RunManifest::new(items))
}

/// Decides whether the walker descends into / yields an entry.
fn keep_entry(entry: &DirEntry, config: &DiscoveryConfig) -> bool {
    // never filter the root itself
    if entry.depth() == 0 {
        return true;
    }

    let name = entry.file_name().to_string_lossy();

    if !config.include_hidden && name.starts_with('.') {
        return false;
    }

    if entry.file_type().is_dir() && config.is_ignored(&name) {
        debug!("Skipping ignored directory {}", entry.path().display());
        return false;
    }

    true
}

/// Regular files, including symlinks whose target is a regular file.
///
/// Links are resolved even when `follow_links` is off; that flag only
/// controls descending into linked directories.
fn is_regular_file(entry: &DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    if !entry.path_is_symlink() {
        return false;
    }
    match std::fs::metadata(entry.path()) {
        Ok(metadata) => metadata.is_file(),
        Err(e) => {
            debug!("Skipping unreadable link {}: {}", entry.path().display(), e);
            false
        }
    }
}

fn absolute_entry_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
