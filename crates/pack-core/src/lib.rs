//! Manifest-driven reconciliation engine for packsync
//!
//! Brings a game directory in line with a remotely published manifest and
//! patches the launcher documents that point at it:
//!
//! - **Manifest**: line-oriented `+path` / `-pattern` operations
//! - **DirectorySynchronizer**: applies operations in order, expanding
//!   archives and deleting by wildcard, never leaving the game directory
//! - **ReconciliationDriver**: fetch, apply, patch documents, report
//!
//! # Architecture
//!
//! ```text
//!                  pack-cli
//!                     |
//!                 pack-core
//!                     |
//!          +----------+----------+
//!          |                     |
//!      pack-docs              pack-fs
//! ```
//!
//! Progress is reported through an injected [`EventSink`] rather than
//! printed, so the caller decides how a run is presented.

pub mod archive;
pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod fetch;
pub mod manifest;
pub mod report;
pub mod synchronizer;
pub mod version;

pub use config::{SyncConfig, BUNDLED_SETTINGS_TEMPLATE};
pub use driver::ReconciliationDriver;
pub use error::{Error, FatalManifest, Result};
pub use events::{EventSink, RecordingSink, SyncEvent, TracingSink};
pub use fetch::{Fetcher, HttpFetcher};
pub use manifest::{Manifest, ManifestOperation};
pub use report::{DocumentKind, DocumentStatus, ReconciliationReport, Stage};
pub use synchronizer::DirectorySynchronizer;
pub use version::VersionInfo;
