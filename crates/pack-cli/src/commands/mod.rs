//! Command implementations for pack-cli

pub mod manifest;
pub mod sync;

pub use manifest::run_manifest;
pub use sync::{SyncArgs, run_sync};
