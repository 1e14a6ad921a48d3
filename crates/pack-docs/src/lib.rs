//! Partial-document patchers for packsync.
//!
//! Each patcher edits one known sub-structure of a document it does not own
//! and leaves every other byte alone:
//!
//! - [`registry`]: brace-structured profile registry, edited by locating a
//!   section's byte span with depth-balanced brace scanning. Strings that
//!   contain unescaped braces confuse the scan; the registry is never fully
//!   parsed.
//! - [`servers`]: binary tag-tree server list, loaded whole, mutated and
//!   written back whole.
//! - [`settings`]: flat `key:value` line file, patched line by line.
//! - [`resource_packs`]: computes the ordered resource-pack override value.

pub mod error;
pub mod registry;
pub mod resource_packs;
pub mod servers;
pub mod settings;

pub use error::{Error, Result};
pub use registry::{ProfileEntry, insert_section, remove_section, replace_section};
pub use resource_packs::{ResourcePackRules, resource_pack_list, resource_pack_value};
pub use servers::{ServerEntry, ServerList, ensure_server};
pub use settings::{SettingsDocument, SettingsOutcome, patch_settings};
