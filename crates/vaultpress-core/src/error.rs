//! Error types for vaultpress.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Top-level result type for vaultpress operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Top-level error type for a sync run.
///
/// Unresolved references and name collisions are deliberately absent:
/// they degrade locally and are only logged and counted.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("source root not found: {}", .0.display())]
    MissingSourceRoot(PathBuf),

    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl SyncError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Process exit status for this failure.
    ///
    /// A missing source root is signalled distinctly from every other failure.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingSourceRoot(_) => 2,
            _ => 1,
        }
    }
}

/// Attach a path to a raw [`std::io::Result`].
pub trait IoContext<T> {
    fn at(self, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|e| SyncError::io(path, e))
    }
}
