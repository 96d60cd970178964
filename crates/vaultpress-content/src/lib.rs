//! # vaultpress-content
//!
//! Rewrites one note's markdown for publication.
//!
//! Rewriting is an ordered pipeline of text transforms, each taking the
//! previous stage's output:
//!
//! 1. [`sanitize`] — escape non-inert HTML tags and `{{ }}` sequences
//! 2. [`embed`] — `![[media]]` and `![alt](path)` to published images
//! 3. [`wikilink`] — `[[Note|alias]]` to site routes
//!
//! Embed syntax is wikilink syntax with a `!` prefix, so stage 2 must
//! consume every embed before stage 3 runs. Fenced code blocks pass
//! through all stages untouched.

pub mod embed;
pub mod sanitize;
pub mod sink;
pub mod title;
pub mod wikilink;

use vaultpress_core::frontmatter::fence_marker;
use vaultpress_core::{Result, SyncConfig};
use vaultpress_vault::VaultIndex;

pub use sink::{AssetSink, DirAssetSink};
pub use title::inject_title;

/// Result of rewriting one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub content: String,
    /// References that degraded to placeholder or plain text.
    pub unresolved: usize,
}

/// Rewrites notes against a frozen [`VaultIndex`].
pub struct ContentRewriter<'a> {
    index: &'a VaultIndex,
    config: &'a SyncConfig,
}

impl<'a> ContentRewriter<'a> {
    #[must_use]
    pub fn new(index: &'a VaultIndex, config: &'a SyncConfig) -> Self {
        Self { index, config }
    }

    /// Run the full pipeline over `raw`, publishing referenced images to `sink`.
    ///
    /// # Errors
    ///
    /// Propagates [`AssetSink::publish`] failures. Unresolved references
    /// are never errors.
    pub fn rewrite(&self, raw: &str, sink: &mut dyn AssetSink) -> Result<Rewritten> {
        let mut unresolved = 0;
        let content = sanitize::sanitize(raw);
        let content = embed::resolve_embeds(
            &content,
            self.index.names(),
            self.config,
            sink,
            &mut unresolved,
        )?;
        let content = wikilink::resolve_wikilinks(&content, self.index, &mut unresolved);
        Ok(Rewritten {
            content,
            unresolved,
        })
    }
}

/// Apply `f` to every stretch of text outside fenced code blocks.
///
/// Fence lines (```` ``` ```` or `~~~`, indented at most three spaces) and
/// everything between them are copied verbatim. An unclosed fence runs to
/// the end of the text.
pub(crate) fn map_prose<E>(
    text: &str,
    mut f: impl FnMut(&str) -> std::result::Result<String, E>,
) -> std::result::Result<String, E> {
    let mut out = String::with_capacity(text.len());
    let mut fence: Option<&'static str> = None;
    let mut chunk_start = 0;
    let mut pos = 0;

    for line in text.split_inclusive('\n') {
        let marker = fence_marker(line);
        match fence {
            None => {
                if let Some(open) = marker {
                    out.push_str(&f(&text[chunk_start..pos])?);
                    fence = Some(open);
                    chunk_start = pos;
                }
            }
            Some(open) => {
                if marker == Some(open) {
                    let end = pos + line.len();
                    out.push_str(&text[chunk_start..end]);
                    fence = None;
                    chunk_start = end;
                }
            }
        }
        pos += line.len();
    }

    if fence.is_some() {
        out.push_str(&text[chunk_start..]);
    } else {
        out.push_str(&f(&text[chunk_start..])?);
    }
    Ok(out)
}
