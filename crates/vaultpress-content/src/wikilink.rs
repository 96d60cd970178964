//! Cross-references between notes.
//!
//! `[[Target]]` and `[[Target|Alias]]` become markdown links to the
//! target's site route. Targets are matched by basename, ignoring case and
//! any `#heading` suffix. A target that is not a note may still be a
//! published file (an archive, a PDF) and links to its mapped path.
//! Unknown targets collapse to their display text.

use std::convert::Infallible;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::warn;

use vaultpress_core::config::strip_markdown_ext;
use vaultpress_vault::name_index::basename;
use vaultpress_vault::VaultIndex;

use crate::map_prose;

static WIKILINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[([^\[\]|]+?)(?:\|([^\[\]]*))?\]\]").expect("Invalid wikilink regex")
});

/// Rewrite every wikilink outside fenced code.
#[must_use]
pub fn resolve_wikilinks(content: &str, index: &VaultIndex, unresolved: &mut usize) -> String {
    let Ok(out) = map_prose(content, |prose| {
        Ok::<_, Infallible>(
            WIKILINK
                .replace_all(prose, |caps: &Captures<'_>| {
                    let target = caps[1].trim();
                    let text = caps
                        .get(2)
                        .map(|m| m.as_str().trim())
                        .filter(|alias| !alias.is_empty())
                        .unwrap_or(target);
                    match route_for(target, index) {
                        Some(url) => format!("[{text}]({url})"),
                        None => {
                            *unresolved += 1;
                            warn!("unresolved link: [[{target}]]");
                            text.to_string()
                        }
                    }
                })
                .into_owned(),
        )
    });
    out
}

/// Site route for a wikilink target, trying it as a note first.
#[must_use]
pub fn route_for(target: &str, index: &VaultIndex) -> Option<String> {
    let name = basename(target).split('#').next().unwrap_or_default().trim();
    if name.is_empty() {
        return None;
    }
    let stem = strip_markdown_ext(name).to_lowercase();

    if let Some(mapping) = index
        .names()
        .lookup(&format!("{stem}.md"))
        .and_then(|source| index.paths().get(source))
    {
        return Some(mapping.route());
    }

    index
        .names()
        .lookup(&stem)
        .and_then(|source| index.paths().get(source))
        .filter(|mapping| !mapping.is_dir)
        .map(|mapping| format!("/{}", mapping.safe_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use vaultpress_core::SyncConfig;

    struct Fixture {
        _dir: tempfile::TempDir,
        index: VaultIndex,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("publish");
        fs::create_dir_all(root.join("notes")).unwrap();
        fs::write(root.join("notes").join("B.md"), "# B").unwrap();
        fs::write(root.join("notes").join("Code.zip"), [0u8]).unwrap();
        fs::write(root.join("index.md"), "home").unwrap();
        let config = SyncConfig {
            source_root: root,
            attachments_dir: dir.path().join("attachments"),
            ..SyncConfig::default()
        };
        let index = VaultIndex::scan(&config).unwrap();
        Fixture { _dir: dir, index }
    }

    fn b_route(f: &Fixture) -> String {
        let source = f.index.names().lookup("b.md").unwrap();
        f.index.paths().get(source).unwrap().route()
    }

    #[test]
    fn links_note_by_case_insensitive_name() {
        let f = fixture();
        let mut unresolved = 0;
        let out = resolve_wikilinks(
            "see [[b]] and [[B.md|the B note]]",
            &f.index,
            &mut unresolved,
        );
        let route = b_route(&f);
        assert_eq!(out, format!("see [b]({route}) and [the B note]({route})"));
        assert!(!route.ends_with(".md"));
        assert_eq!(unresolved, 0);
    }

    #[test]
    fn path_and_heading_suffix_are_ignored_for_lookup() {
        let f = fixture();
        let mut unresolved = 0;
        let out = resolve_wikilinks("[[notes/B#Intro]]", &f.index, &mut unresolved);
        assert_eq!(out, format!("[notes/B#Intro]({})", b_route(&f)));
    }

    #[test]
    fn non_note_file_keeps_extension_in_link() {
        let f = fixture();
        let route = route_for("code.zip", &f.index).unwrap();
        assert!(route.ends_with(".zip"));
        assert!(route.starts_with('/'));
    }

    #[test]
    fn landing_document_routes_to_literal_name() {
        let f = fixture();
        assert_eq!(route_for("index", &f.index).unwrap(), "/index");
    }

    #[test]
    fn unresolved_link_becomes_display_text() {
        let f = fixture();
        let mut unresolved = 0;
        let out = resolve_wikilinks(
            "[[Nowhere]] [[Nowhere|alias]] [[#Heading]]",
            &f.index,
            &mut unresolved,
        );
        assert_eq!(out, "Nowhere alias #Heading");
        assert_eq!(unresolved, 3);
    }

    #[test]
    fn links_in_fenced_code_are_literal() {
        let f = fixture();
        let mut unresolved = 0;
        let text = "~~~\n[[B]]\n~~~\n";
        assert_eq!(resolve_wikilinks(text, &f.index, &mut unresolved), text);
    }
}
