//! Navigation tree generation.

use std::cmp::Ordering;
use std::path::Path;

use vaultpress_core::config::is_markdown;
use vaultpress_core::{NavigationNode, PathMapping, SidebarDescriptor, SyncConfig};
use vaultpress_vault::VaultIndex;

/// Navigation items for the mapped entries inside `dir`.
///
/// Directories become collapsible groups labelled with their original
/// name; groups that end up empty are dropped. Notes become links, except
/// the directory's landing document, which the group itself stands for.
/// Other files are not listed.
#[must_use]
pub fn build_tree(index: &VaultIndex, dir: &Path, config: &SyncConfig) -> Vec<NavigationNode> {
    let mut children: Vec<&PathMapping> = index.paths().children(dir).collect();
    children.sort_by(|a, b| compare_names(&a.original_name, &b.original_name));

    let mut items = Vec::new();
    for mapping in children {
        if mapping.is_dir {
            let nested = build_tree(index, &mapping.source_path, config);
            if !nested.is_empty() {
                items.push(NavigationNode::group(mapping.original_name.clone(), nested));
            }
        } else if is_markdown(&mapping.original_name)
            && !config.is_landing(&mapping.original_name)
        {
            items.push(NavigationNode::leaf(mapping.label(), mapping.route()));
        }
    }
    items
}

/// Sidebar descriptor: one entry per top-level directory with any items,
/// keyed by its route prefix `/<safe path>/`.
#[must_use]
pub fn build_descriptor(index: &VaultIndex, config: &SyncConfig) -> SidebarDescriptor {
    index
        .paths()
        .children(index.root())
        .filter(|m| m.is_dir)
        .filter_map(|m| {
            let items = build_tree(index, &m.source_path, config);
            (!items.is_empty()).then(|| (format!("/{}/", m.safe_path), items))
        })
        .collect()
}

/// Case-insensitive order, ties broken by the exact name.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
