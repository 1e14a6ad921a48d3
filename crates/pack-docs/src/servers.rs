//! Server list stored as a binary tag tree.
//!
//! The document is a root compound holding a `servers` list of compounds:
//!
//! ```text
//! {
//!   servers: [
//!     { name: "Pack Server", ip: "mc.example.com", acceptTextures: 1b, hidden: 0b }
//!   ]
//! }
//! ```
//!
//! The tree is small, so it is always loaded whole, mutated in memory and
//! written back whole. Members the patcher does not know about are carried
//! through untouched.

use std::collections::HashMap;

use fastnbt::Value;
use pack_fs::{NormalizedPath, io};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Name of the list holding server records.
pub const SERVERS_LIST: &str = "servers";

/// Field that identifies a server record.
pub const ADDRESS_FIELD: &str = "ip";

/// In-memory tag tree of a server list document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerList {
    root: HashMap<String, Value>,
}

impl ServerList {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a tree from uncompressed tag-tree bytes.
    ///
    /// # Errors
    /// Returns an error if the bytes are not a valid tree or the root is not
    /// a compound.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match fastnbt::from_bytes::<Value>(bytes)? {
            Value::Compound(root) => Ok(Self { root }),
            _ => Err(Error::UnexpectedTag {
                name: "<root>".to_string(),
            }),
        }
    }

    /// Load the document at `path`, or start from an empty tree if the file
    /// does not exist yet.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        match io::read_optional(path)? {
            Some(bytes) => Self::from_bytes(&bytes),
            None => {
                debug!(path = %path, "server list absent, starting empty");
                Ok(Self::new())
            }
        }
    }

    /// Encode the whole tree.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(fastnbt::to_bytes(&Value::Compound(self.root.clone()))?)
    }

    /// Write the whole tree back to `path`.
    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        let bytes = self.to_bytes()?;
        io::write_atomic(path, &bytes)?;
        Ok(())
    }

    /// Compound elements of the named list. Missing lists, and elements that
    /// are not compounds, yield nothing.
    pub fn entries<'a>(&'a self, list: &str) -> impl Iterator<Item = &'a HashMap<String, Value>> + 'a {
        let items = match self.root.get(list) {
            Some(Value::List(items)) => items.as_slice(),
            _ => &[],
        };
        items.iter().filter_map(|item| match item {
            Value::Compound(fields) => Some(fields),
            _ => None,
        })
    }

    /// Whether an element of `list` has string field `field` equal to `value`.
    pub fn contains_entry(&self, list: &str, field: &str, value: &str) -> bool {
        self.entries(list).any(|fields| {
            matches!(fields.get(field), Some(Value::String(existing)) if existing == value)
        })
    }

    /// Append a compound to `list` unless an element already has the same
    /// `identity` field value. The list is created if absent.
    ///
    /// Returns whether an element was appended.
    ///
    /// # Errors
    /// Returns `Error::UnexpectedTag` if `list` exists but is not a list.
    pub fn add_entry(
        &mut self,
        list: &str,
        identity: &str,
        fields: HashMap<String, Value>,
    ) -> Result<bool> {
        if let Some(Value::String(value)) = fields.get(identity)
            && self.contains_entry(list, identity, value)
        {
            return Ok(false);
        }

        let slot = self
            .root
            .entry(list.to_string())
            .or_insert_with(|| Value::List(Vec::new()));

        match slot {
            Value::List(items) => {
                items.push(Value::Compound(fields));
                Ok(true)
            }
            _ => Err(Error::UnexpectedTag {
                name: list.to_string(),
            }),
        }
    }
}

/// A server record as shown in the multiplayer screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEntry {
    pub name: String,
    pub address: String,
    pub accept_textures: bool,
    pub hidden: bool,
}

impl ServerEntry {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            accept_textures: true,
            hidden: false,
        }
    }

    /// The record's tag fields.
    pub fn fields(&self) -> HashMap<String, Value> {
        HashMap::from([
            ("name".to_string(), Value::String(self.name.clone())),
            (ADDRESS_FIELD.to_string(), Value::String(self.address.clone())),
            ("acceptTextures".to_string(), Value::Byte(self.accept_textures as i8)),
            ("hidden".to_string(), Value::Byte(self.hidden as i8)),
        ])
    }
}

/// Make sure the server list at `path` contains `entry`.
///
/// Returns `true` if the entry was added and the document rewritten, `false`
/// if a record with the same address already existed (the file is then left
/// untouched).
pub fn ensure_server(path: &NormalizedPath, entry: &ServerEntry) -> Result<bool> {
    let mut tree = ServerList::load(path)?;

    if !tree.add_entry(SERVERS_LIST, ADDRESS_FIELD, entry.fields())? {
        debug!(address = %entry.address, "server entry already present");
        return Ok(false);
    }

    tree.save(path)?;
    info!(name = %entry.name, address = %entry.address, "added server entry");
    Ok(true)
}
