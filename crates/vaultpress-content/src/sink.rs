//! Destination for images referenced by rewritten notes.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use vaultpress_core::error::IoContext;
use vaultpress_core::Result;

/// Receives images as the rewriter resolves them.
pub trait AssetSink {
    /// Make `source` available in the asset namespace under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`vaultpress_core::SyncError::Io`] if the asset cannot be stored.
    fn publish(&mut self, source: &Path, name: &str) -> Result<()>;
}

/// Copies assets into one flat output directory, created on first use.
///
/// Each destination name is written at most once per sink; a second
/// source mapping to the same name is ignored.
#[derive(Debug)]
pub struct DirAssetSink {
    dir: PathBuf,
    published: HashSet<String>,
}

impl DirAssetSink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            published: HashSet::new(),
        }
    }

    /// Number of distinct assets written.
    #[must_use]
    pub fn published(&self) -> usize {
        self.published.len()
    }
}

impl AssetSink for DirAssetSink {
    fn publish(&mut self, source: &Path, name: &str) -> Result<()> {
        if self.published.contains(name) {
            return Ok(());
        }
        fs::create_dir_all(&self.dir).at(&self.dir)?;
        let dest = self.dir.join(name);
        fs::copy(source, &dest).at(source)?;
        debug!("published {} -> {}", source.display(), dest.display());
        self.published.insert(name.to_string());
        Ok(())
    }
}
