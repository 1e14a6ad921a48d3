//! Normalized path handling with root containment checks

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path normalized to use forward slashes internally.
///
/// Dot segments are resolved on construction, so a path that tries to climb
/// out of a directory with `..` ends up outside of it and fails
/// [`NormalizedPath::is_within`]. Conversion to the platform-native form only
/// happens at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes and resolves `.`/`..`
    /// segments. A `..` that would climb above the first component is dropped.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: clean(&path_str.replace('\\', "/")),
        }
    }

    /// Canonicalize an existing directory and normalize the result.
    ///
    /// Uses `dunce` so that Windows paths do not carry the `\\?\` prefix,
    /// which would break prefix comparisons against joined children.
    pub fn canonical(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let resolved = dunce::canonicalize(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::new(resolved))
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment, resolving dot segments.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        let joined = if self.inner.is_empty() {
            segment_normalized
        } else if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self {
            inner: clean(&joined),
        }
    }

    /// Resolve a relative path underneath this root.
    ///
    /// The relative path is split on `/` (after normalizing `\`) and every
    /// segment is joined in turn, so intermediate directories never need to
    /// exist as one compound name. The result must stay inside `self`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathEscapesRoot`] if the resolved path lies outside
    /// this root.
    pub fn resolve_under(&self, relative: &str) -> Result<Self> {
        let normalized = relative.replace('\\', "/");
        if normalized.starts_with('/') || has_drive_prefix(&normalized) {
            return Err(Error::PathEscapesRoot {
                path: relative.to_string(),
                root: self.inner.clone(),
            });
        }

        let resolved = normalized
            .split('/')
            .fold(self.clone(), |acc, part| acc.join(part));

        if resolved.is_within(self) {
            Ok(resolved)
        } else {
            Err(Error::PathEscapesRoot {
                path: relative.to_string(),
                root: self.inner.clone(),
            })
        }
    }

    /// Check whether this path equals `root` or lies underneath it.
    pub fn is_within(&self, root: &NormalizedPath) -> bool {
        if self.inner == root.inner {
            return true;
        }
        if root.inner.ends_with('/') {
            self.inner.starts_with(&root.inner)
        } else {
            self.inner.starts_with(&format!("{}/", root.inner))
        }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) if trimmed.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 || idx == name.len() - 1 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }
}

/// Collapse empty and dot segments of a forward-slash path.
fn clean(raw: &str) -> String {
    let is_network = raw.starts_with("//") && !raw.starts_with("///");
    let is_absolute = raw.starts_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                let at_drive = parts.len() == 1 && has_drive_prefix(parts[0]);
                if !parts.is_empty() && !at_drive {
                    parts.pop();
                }
            }
            other => parts.push(other),
        }
    }

    let body = parts.join("/");
    if is_network {
        format!("//{}", body)
    } else if is_absolute {
        format!("/{}", body)
    } else {
        body
    }
}

/// `C:` style prefix.
fn has_drive_prefix(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
