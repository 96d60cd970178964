//! Case-insensitive basename index for fuzzy reference resolution.
//!
//! Notes reference each other and their media by bare name
//! (`[[Meeting Notes]]`, `![[diagram.png]]`) rather than by relative
//! path. The index maps every lower-cased basename under the source root
//! to one source file.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use tracing::warn;

use vaultpress_core::{Result, SyncConfig};

use crate::walk::walk_vault;

#[derive(Debug, Default)]
pub struct NameIndex {
    by_name: HashMap<String, PathBuf>,
    attachments_dir: PathBuf,
    collisions: usize,
}

impl NameIndex {
    /// Index every file under `root`, then every file under
    /// `attachments_dir` that does not shadow a root entry.
    ///
    /// Within the root, duplicate basenames resolve to the entry visited
    /// last in sorted traversal order; each duplicate is logged.
    /// A missing attachment directory is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`vaultpress_core::SyncError::Io`] if a directory cannot be listed.
    pub fn build(root: &Path, attachments_dir: &Path, config: &SyncConfig) -> Result<Self> {
        let mut index = Self {
            attachments_dir: attachments_dir.to_path_buf(),
            ..Self::default()
        };

        for entry in walk_vault(root, config)? {
            if entry.is_dir {
                continue;
            }
            let key = entry.name.to_lowercase();
            if let Some(previous) = index.by_name.insert(key, entry.source_path.clone()) {
                index.collisions += 1;
                warn!(
                    "ambiguous name {}: {} shadows {}",
                    entry.name,
                    entry.source_path.display(),
                    previous.display()
                );
            }
        }

        if attachments_dir.is_dir() {
            for entry in walk_vault(attachments_dir, config)? {
                if !entry.is_dir {
                    index
                        .by_name
                        .entry(entry.name.to_lowercase())
                        .or_insert(entry.source_path);
                }
            }
        }

        Ok(index)
    }

    /// Exact lookup of an already lower-cased basename.
    #[must_use]
    pub fn lookup(&self, lowercase_name: &str) -> Option<&Path> {
        self.by_name.get(lowercase_name).map(PathBuf::as_path)
    }

    /// Resolve a reference as written in a note.
    ///
    /// The reference is URI-decoded and reduced to its basename for the
    /// index lookup. Failing that, it is joined literally onto the
    /// attachment directory; references escaping that directory are refused.
    #[must_use]
    pub fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let decoded = decode(reference);
        let basename = basename(&decoded);
        if basename.is_empty() {
            return None;
        }
        if let Some(found) = self.lookup(&basename.to_lowercase()) {
            return Some(found.to_path_buf());
        }

        let relative = Path::new(decoded.as_str());
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }
        let candidate = self.attachments_dir.join(relative);
        candidate.is_file().then_some(candidate)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Basenames under the source root that were indexed more than once.
    #[must_use]
    pub fn collisions(&self) -> usize {
        self.collisions
    }
}

/// Percent-decode a reference; undecodable input is used verbatim.
#[must_use]
pub fn decode(reference: &str) -> String {
    urlencoding::decode(reference)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| reference.to_string())
}

/// Last `/`- or `\`-separated segment.
#[must_use]
pub fn basename(reference: &str) -> &str {
    reference
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(reference)
}
