//! Discovered vault entries and their output mappings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One file or directory under the source root. Immutable once discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultEntry {
    /// Absolute (or root-joined) source path.
    pub source_path: PathBuf,
    /// Original human-readable file or directory name.
    pub name: String,
    pub is_dir: bool,
}

impl VaultEntry {
    #[must_use]
    pub fn new(source_path: PathBuf, is_dir: bool) -> Self {
        let name = source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            source_path,
            name,
            is_dir,
        }
    }
}

/// Output location assigned to a [`VaultEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMapping {
    pub source_path: PathBuf,
    /// Obfuscated, extension-preserving name; a function of `original_name` only.
    pub safe_name: String,
    /// `/`-joined safe names of every ancestor plus this entry, relative to the output root.
    pub safe_path: String,
    pub is_dir: bool,
    pub original_name: String,
}

impl PathMapping {
    /// Site route for this entry: `/` + `safe_path`, markdown extension stripped.
    #[must_use]
    pub fn route(&self) -> String {
        format!("/{}", crate::config::strip_markdown_ext(&self.safe_path))
    }

    /// Output-tree location under `output_root`.
    #[must_use]
    pub fn output_path(&self, output_root: &Path) -> PathBuf {
        self.safe_path
            .split('/')
            .fold(output_root.to_path_buf(), |acc, seg| acc.join(seg))
    }

    /// Original name without its markdown extension, used as a display label.
    #[must_use]
    pub fn label(&self) -> &str {
        crate::config::strip_markdown_ext(&self.original_name)
    }
}
