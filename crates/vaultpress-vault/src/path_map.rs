//! Output path assignment.
//!
//! Every published entry gets a short obfuscated name derived from its
//! original name alone, so the output tree has ASCII-only, URL-safe paths
//! regardless of what the vault's file names contain:
//! `notes/Daily Log.md` becomes `<8 hex>/<8 hex>.md`.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::warn;

use vaultpress_core::config::is_landing_name;
use vaultpress_core::{PathMapping, Result, SyncConfig};

use crate::walk::walk_vault;

/// Hex digits of the name digest kept in a safe name.
pub const DIGEST_LEN: usize = 8;

/// Deterministic obfuscated name for `name`.
///
/// The landing document keeps its conventional name (normalized to the
/// configured spelling). Any other name becomes the first [`DIGEST_LEN`]
/// hex digits of its SHA-256 followed by the original extension.
#[must_use]
pub fn safe_name(name: &str, landing_document: &str) -> String {
    if is_landing_name(name, landing_document) {
        return landing_document.to_string();
    }
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("{}{}", &digest[..DIGEST_LEN], extension_of(name))
}

/// Extension including the dot; empty for dotless names and dotfiles.
fn extension_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) if pos > 0 => &name[pos..],
        _ => "",
    }
}

/// Source path to output mapping for every entry under the source root.
#[derive(Debug, Default)]
pub struct PathMap {
    entries: Vec<PathMapping>,
    by_source: HashMap<PathBuf, usize>,
    children: BTreeMap<PathBuf, Vec<usize>>,
    collisions: usize,
}

impl PathMap {
    /// Walk `root` and map every publishable entry.
    ///
    /// # Errors
    ///
    /// Returns [`vaultpress_core::SyncError::Io`] if the walk fails.
    pub fn scan(root: &Path, config: &SyncConfig) -> Result<Self> {
        let mut map = Self::default();
        let mut claimed: HashMap<String, PathBuf> = HashMap::new();

        for entry in walk_vault(root, config)? {
            let parent = entry.source_path.parent().unwrap_or(root).to_path_buf();
            let parent_safe = if parent.as_path() == root {
                String::new()
            } else {
                map.get(&parent)
                    .map(|m| m.safe_path.clone())
                    .unwrap_or_default()
            };

            let safe_name = safe_name(&entry.name, &config.landing_document);
            let safe_path = if parent_safe.is_empty() {
                safe_name.clone()
            } else {
                format!("{parent_safe}/{safe_name}")
            };

            if let Some(previous) = claimed.insert(safe_path.clone(), entry.source_path.clone()) {
                map.collisions += 1;
                warn!(
                    "output path collision at {}: {} replaces {}",
                    safe_path,
                    entry.source_path.display(),
                    previous.display()
                );
            }

            let idx = map.entries.len();
            map.by_source.insert(entry.source_path.clone(), idx);
            map.children.entry(parent).or_default().push(idx);
            map.entries.push(PathMapping {
                source_path: entry.source_path,
                safe_name,
                safe_path,
                is_dir: entry.is_dir,
                original_name: entry.name,
            });
        }

        Ok(map)
    }

    #[must_use]
    pub fn get(&self, source: &Path) -> Option<&PathMapping> {
        self.by_source.get(source).map(|&i| &self.entries[i])
    }

    /// Mapped entries directly inside `dir`, in traversal order.
    pub fn children(&self, dir: &Path) -> impl Iterator<Item = &PathMapping> {
        self.children
            .get(dir)
            .into_iter()
            .flatten()
            .map(|&i| &self.entries[i])
    }

    /// All mappings, parents before children.
    pub fn iter(&self) -> impl Iterator<Item = &PathMapping> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct sources that were assigned an already-used output path.
    #[must_use]
    pub fn collisions(&self) -> usize {
        self.collisions
    }
}
