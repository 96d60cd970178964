//! # vaultpress-core
//!
//! Core types, configuration, and errors shared by the vaultpress crates.
//!
//! - [`VaultEntry`] — one file or directory discovered under the source root
//! - [`PathMapping`] — the obfuscated output location assigned to an entry
//! - [`NavigationNode`] — a sidebar leaf or group
//! - [`SyncConfig`] — source/output locations and publishing policy
//! - Error hierarchy ([`SyncError`])
//! - Frontmatter and title detection ([`frontmatter`])

pub mod config;
pub mod entry;
pub mod error;
pub mod frontmatter;
pub mod nav;

pub use config::SyncConfig;
pub use entry::{PathMapping, VaultEntry};
pub use error::{Result, SyncError};
pub use nav::{NavigationNode, SidebarDescriptor};
