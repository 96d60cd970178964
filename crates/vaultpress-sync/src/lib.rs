//! # vaultpress-sync
//!
//! Runs a full publication of a vault into a site document tree.
//!
//! A run is four strictly sequential phases:
//! - **clean** — remove everything in the output root except build-owned entries
//! - **scan** — build the frozen [`VaultIndex`](vaultpress_vault::VaultIndex)
//! - **process** — mirror the vault, rewriting notes and copying files
//! - **emit** — write the sidebar descriptor
//!
//! The first failure aborts the run; there is no rollback.

pub mod orchestrator;
pub mod report;
pub mod sidebar;

pub use orchestrator::{run, Phase};
pub use report::SyncReport;
pub use sidebar::{build_descriptor, build_tree};
