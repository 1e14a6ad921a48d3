//! Error types for pack-core

use std::path::PathBuf;

/// Result type for pack-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Conditions that abort a whole run before any file is touched.
#[derive(Debug, thiserror::Error)]
pub enum FatalManifest {
    #[error("Manifest unreachable at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("Version document has {lines} line(s), expected at least 2")]
    TooShort { lines: usize },
}

/// Errors that can occur in pack-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    FatalManifest(#[from] FatalManifest),

    /// A single add or remove failed; the run continues.
    #[error("Operation {operation} failed: {reason}")]
    Operation { operation: String, reason: String },

    #[error("Fetch failed for {url}: {message}")]
    FetchFailed { url: String, message: String },

    /// A document lacks a section the patcher needs; fatal for that document.
    #[error("Anchor {anchor} missing in {document}")]
    PatchAnchorMissing { document: String, anchor: String },

    /// A path would resolve outside the game directory.
    #[error("Path traversal rejected: {path}")]
    TraversalRejected { path: String },

    #[error("Archive error in {path}: {message}")]
    Archive { path: PathBuf, message: String },

    #[error("Updater {running} is outdated, latest is {latest}")]
    UpdaterOutdated { running: String, latest: String },

    #[error("Configuration error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Transparent wrappers for underlying crate errors
    #[error(transparent)]
    Fs(#[from] pack_fs::Error),

    #[error(transparent)]
    Docs(#[from] pack_docs::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
