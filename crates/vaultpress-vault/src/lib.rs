//! # vaultpress-vault
//!
//! Scan phase for vaultpress.
//!
//! The vault is the authoritative source. A scan walks it once, in sorted
//! order, and produces a [`VaultIndex`]: the [`PathMap`] of output
//! locations plus the [`NameIndex`] used for fuzzy reference resolution.
//! Both are frozen once built and only ever read afterwards.

pub mod name_index;
pub mod path_map;
pub mod walk;

use std::path::{Path, PathBuf};

use tracing::info;

use vaultpress_core::{Result, SyncConfig, SyncError};

pub use name_index::NameIndex;
pub use path_map::{safe_name, PathMap};

/// Immutable result of the scan phase.
#[derive(Debug)]
pub struct VaultIndex {
    root: PathBuf,
    paths: PathMap,
    names: NameIndex,
}

impl VaultIndex {
    /// Scan the configured source root and attachment directory.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingSourceRoot`] if the source root is not a
    /// directory, or [`SyncError::Io`] if a directory cannot be listed.
    pub fn scan(config: &SyncConfig) -> Result<Self> {
        let root = config.source_root.clone();
        if !root.is_dir() {
            return Err(SyncError::MissingSourceRoot(root));
        }

        let paths = PathMap::scan(&root, config)?;
        let names = NameIndex::build(&root, &config.attachments_dir, config)?;
        info!(
            entries = paths.len(),
            names = names.len(),
            "scanned {}",
            root.display()
        );

        Ok(Self { root, paths, names })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn paths(&self) -> &PathMap {
        &self.paths
    }

    #[must_use]
    pub fn names(&self) -> &NameIndex {
        &self.names
    }

    /// Name collisions seen while scanning (basename and safe path).
    #[must_use]
    pub fn collisions(&self) -> usize {
        self.paths.collisions() + self.names.collisions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn scan_rejects_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = SyncConfig {
            source_root: dir.path().join("nope"),
            ..SyncConfig::default()
        };
        let err = VaultIndex::scan(&config).unwrap_err();
        assert!(matches!(err, SyncError::MissingSourceRoot(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn scan_builds_both_indices() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("publish");
        fs::create_dir_all(root.join("notes")).unwrap();
        fs::write(root.join("notes").join("A.md"), "# A").unwrap();
        fs::write(root.join("pic.png"), [0u8]).unwrap();

        let config = SyncConfig {
            source_root: root.clone(),
            attachments_dir: dir.path().join("attachments"),
            ..SyncConfig::default()
        };
        let index = VaultIndex::scan(&config).unwrap();
        assert_eq!(index.root(), root.as_path());
        assert_eq!(index.paths().len(), 3);
        assert!(index.names().lookup("a.md").is_some());
        assert!(index.names().lookup("pic.png").is_some());
        assert_eq!(index.collisions(), 0);
    }
}
