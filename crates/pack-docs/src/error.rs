//! Error types for pack-docs

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] pack_fs::Error),

    /// A required anchor such as a container section is absent.
    #[error("Anchor {anchor} not found in {document}")]
    AnchorMissing { anchor: String, document: String },

    #[error("Unbalanced braces in section {key}")]
    UnbalancedBraces { key: String },

    #[error("Tag {name} has an unexpected type")]
    UnexpectedTag { name: String },

    #[error("Tag-tree codec error: {0}")]
    Nbt(#[from] fastnbt::error::Error),
}
