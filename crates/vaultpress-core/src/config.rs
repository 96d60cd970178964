//! Run configuration.
//!
//! Defaults reproduce the fixed layout of a vault checked out next to a
//! VitePress site:
//! ```toml
//! source_root = "vault/publish"
//! output_root = "site/docs"
//! attachments_dir = "vault/attachments"
//! keep = [".vitepress", "public"]
//! ```
//! Every field is optional in `vaultpress.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IoContext, Result, SyncError};

/// File name looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "vaultpress.toml";

/// Locations and publishing policy for a sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Root of the vault subtree being published.
    pub source_root: PathBuf,
    /// Document tree of the static site.
    pub output_root: PathBuf,
    /// Searched only when a reference is not found under `source_root`.
    pub attachments_dir: PathBuf,
    /// Output-root entries owned by the site build; never cleaned.
    pub keep: Vec<String>,
    /// Flat namespace for referenced images, relative to `output_root`.
    pub asset_dir: PathBuf,
    /// URL prefix under which `asset_dir` is served.
    pub asset_url_prefix: String,
    /// Navigation descriptor location, relative to `output_root`.
    pub sidebar_file: PathBuf,
    /// Conventional section landing document, kept under its literal name.
    pub landing_document: String,
    /// Directory names skipped in addition to dotfiles.
    pub ignore_dirs: Vec<String>,
    /// Lower-case extensions treated as images.
    pub image_extensions: Vec<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("vault/publish"),
            output_root: PathBuf::from("site/docs"),
            attachments_dir: PathBuf::from("vault/attachments"),
            keep: vec![".vitepress".to_string(), "public".to_string()],
            asset_dir: PathBuf::from("public/assets"),
            asset_url_prefix: "/assets".to_string(),
            sidebar_file: PathBuf::from(".vitepress/sidebar.json"),
            landing_document: "index.md".to_string(),
            ignore_dirs: vec!["node_modules".to_string()],
            image_extensions: ["png", "jpg", "jpeg", "gif", "svg", "webp", "bmp", "tiff"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl SyncConfig {
    /// Parse a TOML configuration string.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] on malformed TOML or unknown keys.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SyncError::Config(e.to_string()))
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] if the file cannot be read and
    /// [`SyncError::Config`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).at(path)?;
        Self::from_toml(&content)
    }

    /// Load `path` if given, else `vaultpress.toml` from `cwd` when present,
    /// else the defaults.
    ///
    /// # Errors
    ///
    /// Propagates [`SyncConfig::load`] failures.
    pub fn discover(path: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let candidate = cwd.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Absolute-or-relative directory receiving published images.
    #[must_use]
    pub fn asset_root(&self) -> PathBuf {
        self.output_root.join(&self.asset_dir)
    }

    /// Navigation descriptor location.
    #[must_use]
    pub fn sidebar_path(&self) -> PathBuf {
        self.output_root.join(&self.sidebar_file)
    }

    /// Dotfiles and build-tool directories are never published.
    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        name.starts_with('.') || self.ignore_dirs.iter().any(|d| d == name)
    }

    #[must_use]
    pub fn is_landing(&self, name: &str) -> bool {
        is_landing_name(name, &self.landing_document)
    }

    #[must_use]
    pub fn is_image(&self, name: &str) -> bool {
        extension_lower(name).is_some_and(|ext| self.image_extensions.iter().any(|e| *e == ext))
    }
}

/// `true` for `.md` documents (case-sensitive, as the site generator is).
#[must_use]
pub fn is_markdown(name: &str) -> bool {
    name.ends_with(".md")
}

/// `true` if `name` is the landing document `landing`.
///
/// The stem is compared ignoring ASCII case; a markdown landing document
/// only matches names ending in a literal `.md`.
#[must_use]
pub fn is_landing_name(name: &str, landing: &str) -> bool {
    if is_markdown(landing) {
        is_markdown(name)
            && strip_markdown_ext(name).eq_ignore_ascii_case(strip_markdown_ext(landing))
    } else {
        name.eq_ignore_ascii_case(landing)
    }
}

/// Strip a trailing `.md` if present.
#[must_use]
pub fn strip_markdown_ext(name: &str) -> &str {
    name.strip_suffix(".md").unwrap_or(name)
}

fn extension_lower(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_vault_next_to_site_layout() {
        let cfg = SyncConfig::default();
        assert_eq!(cfg.source_root, PathBuf::from("vault/publish"));
        assert_eq!(cfg.output_root, PathBuf::from("site/docs"));
        assert_eq!(cfg.asset_root(), PathBuf::from("site/docs/public/assets"));
        assert_eq!(
            cfg.sidebar_path(),
            PathBuf::from("site/docs/.vitepress/sidebar.json")
        );
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let cfg = SyncConfig::from_toml("source_root = \"notes\"\nkeep = [\"public\"]\n").unwrap();
        assert_eq!(cfg.source_root, PathBuf::from("notes"));
        assert_eq!(cfg.keep, vec!["public".to_string()]);
        assert_eq!(cfg.landing_document, "index.md");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = SyncConfig::from_toml("sourc_root = \"x\"").unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));
    }

    #[test]
    fn discover_prefers_file_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            SyncConfig::discover(None, dir.path()).unwrap(),
            SyncConfig::default()
        );

        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "output_root = \"out\"\n",
        )
        .unwrap();
        let cfg = SyncConfig::discover(None, dir.path()).unwrap();
        assert_eq!(cfg.output_root, PathBuf::from("out"));
    }

    #[test]
    fn classifies_names() {
        let cfg = SyncConfig::default();
        assert!(cfg.is_ignored(".obsidian"));
        assert!(cfg.is_ignored("node_modules"));
        assert!(!cfg.is_ignored("notes"));
        assert!(cfg.is_landing("Index.md"));
        assert!(!cfg.is_landing("index.markdown"));
        assert!(!cfg.is_landing("INDEX.MD"));
        assert!(!cfg.is_landing("index.Md"));
        assert!(cfg.is_landing("INDEX.md"));
        assert!(cfg.is_image("Photo.JPG"));
        assert!(!cfg.is_image("archive.zip"));
        assert!(!cfg.is_image("noext"));
        assert!(is_markdown("a.md"));
        assert_eq!(strip_markdown_ext("a.md"), "a");
        assert_eq!(strip_markdown_ext("a.zip"), "a.zip");
    }
}
