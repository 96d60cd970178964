//! Ordered traversal of a vault directory.

use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use vaultpress_core::{Result, SyncConfig, SyncError, VaultEntry};

/// Every publishable entry under `root`, parents before children, siblings
/// sorted by file name so traversal order is stable across platforms.
///
/// Dotfiles and configured build-tool directories are pruned with their
/// whole subtree. Entries that are neither files nor directories (dangling
/// links, sockets) are skipped.
///
/// # Errors
///
/// Returns [`SyncError::Io`] if any directory cannot be listed.
pub fn walk_vault(root: &Path, config: &SyncConfig) -> Result<Vec<VaultEntry>> {
    let mut entries = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored(e, config));

    for entry in walker {
        let entry = entry.map_err(walk_error)?;
        let file_type = entry.file_type();
        if !file_type.is_dir() && !file_type.is_file() {
            tracing::debug!("skipping special entry {}", entry.path().display());
            continue;
        }
        entries.push(VaultEntry::new(entry.into_path(), file_type.is_dir()));
    }
    Ok(entries)
}

fn is_ignored(entry: &DirEntry, config: &SyncConfig) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| config.is_ignored(name))
}

fn walk_error(err: walkdir::Error) -> SyncError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    let io = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
    SyncError::io(path, io)
}
