//! Error types for pack-fs

use std::path::PathBuf;

/// Result type for pack-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pack-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path {path} escapes root {root}")]
    PathEscapesRoot { path: String, root: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
