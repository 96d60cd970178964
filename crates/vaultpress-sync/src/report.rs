//! Summary of a completed run.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Notes rewritten into the output tree.
    pub documents: usize,
    /// Non-image files copied verbatim.
    pub assets_copied: usize,
    /// Distinct images published to the asset namespace.
    pub images_published: usize,
    /// Embeds and links that degraded to placeholders or plain text.
    pub unresolved_references: usize,
    /// Duplicate basenames and output paths resolved last-write-wins.
    pub name_collisions: usize,
    /// Top-level sections in the sidebar descriptor.
    pub sidebar_sections: usize,
}
