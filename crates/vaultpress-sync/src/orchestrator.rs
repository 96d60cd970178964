//! Phase sequencing for a sync run.

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use vaultpress_content::{inject_title, ContentRewriter, DirAssetSink};
use vaultpress_core::config::is_markdown;
use vaultpress_core::error::IoContext;
use vaultpress_core::{Result, SyncConfig, SyncError};
use vaultpress_vault::VaultIndex;

use crate::report::SyncReport;
use crate::sidebar::build_descriptor;

/// Stages of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Clean,
    Scan,
    Process,
    Emit,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Clean => "clean",
            Self::Scan => "scan",
            Self::Process => "process",
            Self::Emit => "emit",
        };
        f.write_str(name)
    }
}

/// Publish the configured vault into the configured output tree.
///
/// The source root is checked before anything is deleted, so a missing
/// vault leaves the published site intact, and a layout in which cleaning
/// would delete vault content is refused.
///
/// # Errors
///
/// Returns [`SyncError::MissingSourceRoot`] if the vault is absent,
/// [`SyncError::Config`] if the vault and output tree overlap, and
/// [`SyncError::Io`] on the first filesystem failure in any phase.
pub fn run(config: &SyncConfig) -> Result<SyncReport> {
    if !config.source_root.is_dir() {
        return Err(SyncError::MissingSourceRoot(config.source_root.clone()));
    }
    check_layout(config)?;

    info!(phase = %Phase::Clean, "cleaning {}", config.output_root.display());
    clean(config)?;

    info!(phase = %Phase::Scan, "scanning {}", config.source_root.display());
    let index = VaultIndex::scan(config)?;

    info!(phase = %Phase::Process, "processing {} entries", index.paths().len());
    let mut report = process(&index, config)?;
    report.name_collisions = index.collisions();

    info!(phase = %Phase::Emit, "writing {}", config.sidebar_path().display());
    report.sidebar_sections = emit(&index, config)?;

    info!(
        documents = report.documents,
        assets = report.assets_copied,
        images = report.images_published,
        unresolved = report.unresolved_references,
        "sync complete"
    );
    Ok(report)
}

/// Remove every output-root entry not listed in `keep`.
///
/// Kept entries are left intact, including the asset namespace when it
/// lives inside one; published images are overwritten in place.
///
/// # Errors
///
/// Returns [`SyncError::Io`] if an entry cannot be listed or removed.
pub fn clean(config: &SyncConfig) -> Result<()> {
    let out = &config.output_root;
    fs::create_dir_all(out).at(out)?;

    for entry in fs::read_dir(out).at(out)? {
        let entry = entry.at(out)?;
        if is_kept(config, Path::new(&entry.file_name())) {
            continue;
        }
        remove_entry(&entry.path())?;
    }
    Ok(())
}

fn is_kept(config: &SyncConfig, name: &Path) -> bool {
    config.keep.iter().any(|k| name.to_str() == Some(k.as_str()))
}

/// Refuse layouts where cleaning the output root would delete vault
/// content: the source root or attachment directory at or below a cleaned
/// output entry, or the output root inside the source root.
///
/// # Errors
///
/// Returns [`SyncError::Config`] describing the overlap.
pub fn check_layout(config: &SyncConfig) -> Result<()> {
    // An output root that does not exist yet has nothing to clean.
    let Ok(out) = config.output_root.canonicalize() else {
        return Ok(());
    };
    let source = config.source_root.canonicalize().at(&config.source_root)?;

    if out.starts_with(&source) {
        return Err(SyncError::Config(format!(
            "output root {} lies inside source root {}",
            out.display(),
            source.display()
        )));
    }

    let inputs = [
        ("source root", source),
        ("attachments directory", config.attachments_dir.clone()),
    ];
    for (what, path) in inputs {
        let Ok(path) = path.canonicalize() else {
            continue;
        };
        let Ok(relative) = path.strip_prefix(&out) else {
            continue;
        };
        let protected = relative
            .components()
            .next()
            .is_some_and(|top| is_kept(config, Path::new(top.as_os_str())));
        if !protected {
            return Err(SyncError::Config(format!(
                "{what} {} would be removed by cleaning output root {}",
                path.display(),
                out.display()
            )));
        }
    }
    Ok(())
}

fn remove_entry(path: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(path).at(path)?;
    if meta.is_dir() {
        fs::remove_dir_all(path).at(path)
    } else {
        fs::remove_file(path).at(path)
    }
}

/// Mirror the vault into the output tree.
///
/// Notes are titled, rewritten, and written to their mapped path. Other
/// files are copied verbatim, except images, which are only published
/// when a note references them.
///
/// # Errors
///
/// Returns [`SyncError::Io`] on the first read, write, or copy failure.
pub fn process(index: &VaultIndex, config: &SyncConfig) -> Result<SyncReport> {
    let rewriter = ContentRewriter::new(index, config);
    let mut sink = DirAssetSink::new(config.asset_root());
    let mut report = SyncReport::default();
    fs::create_dir_all(&config.output_root).at(&config.output_root)?;

    for mapping in index.paths().iter() {
        let dest = mapping.output_path(&config.output_root);
        if mapping.is_dir {
            fs::create_dir_all(&dest).at(&dest)?;
        } else if is_markdown(&mapping.original_name) {
            let bytes = fs::read(&mapping.source_path).at(&mapping.source_path)?;
            let raw = String::from_utf8_lossy(&bytes);
            let titled = inject_title(&raw, &mapping.original_name);
            let rewritten = rewriter.rewrite(&titled, &mut sink)?;
            fs::write(&dest, rewritten.content).at(&dest)?;
            report.documents += 1;
            report.unresolved_references += rewritten.unresolved;
            info!("processed {} -> {}", mapping.original_name, mapping.safe_path);
        } else if !config.is_image(&mapping.original_name) {
            fs::copy(&mapping.source_path, &dest).at(&mapping.source_path)?;
            report.assets_copied += 1;
            info!("copied asset {} -> {}", mapping.original_name, mapping.safe_path);
        } else {
            debug!("deferring image {}", mapping.original_name);
        }
    }

    report.images_published = sink.published();
    Ok(report)
}

/// Write the sidebar descriptor and return the number of sections.
///
/// # Errors
///
/// Returns [`SyncError::Serialization`] or [`SyncError::Io`] on failure.
pub fn emit(index: &VaultIndex, config: &SyncConfig) -> Result<usize> {
    let descriptor = build_descriptor(index, config);
    let json = serde_json::to_string_pretty(&descriptor)
        .map_err(|e| SyncError::Serialization(e.to_string()))?;

    let path = config.sidebar_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).at(parent)?;
    }
    fs::write(&path, json).at(&path)?;
    Ok(descriptor.len())
}
