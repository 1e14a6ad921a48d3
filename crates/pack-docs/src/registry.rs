//! Section surgery for the brace-structured profile registry.
//!
//! Sections are addressed by their quoted key. A section's extent is found by
//! scanning braces from its opening `{` with a depth counter, which spans
//! nested objects without building an object model of the document:
//!
//! ```text
//! "profiles": {
//!   "X": { "nested": { ... } },   <- span of "X" ends where depth returns to 0
//!   "Y": { ... }
//! }
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use crate::error::{Error, Result};

/// Locate the first `"key":` that is followed by a `{`.
///
/// Returns `(anchor_start, open_brace, close_brace)` byte offsets.
fn find_section(doc: &str, key: &str) -> Result<Option<(usize, usize, usize)>> {
    let anchor = format!("\"{}\":", key);
    let bytes = doc.as_bytes();

    let mut from = 0;
    while let Some(pos) = doc[from..].find(&anchor) {
        let anchor_start = from + pos;
        let mut open = anchor_start + anchor.len();
        while open < bytes.len() && bytes[open].is_ascii_whitespace() {
            open += 1;
        }

        if open < bytes.len() && bytes[open] == b'{' {
            let close = matching_brace(bytes, open).ok_or_else(|| Error::UnbalancedBraces {
                key: key.to_string(),
            })?;
            return Ok(Some((anchor_start, open, close)));
        }

        from = anchor_start + 1;
    }

    Ok(None)
}

/// Offset of the `}` that closes the `{` at `open`.
fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (offset, byte) in bytes[open + 1..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + 1 + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Removes the section stored under `key`.
///
/// The deleted span covers the key, its brace-balanced block, the whitespace
/// leading up to the key and one trailing comma. When the section is the last
/// member of its container there is no trailing comma, so the comma that
/// separated it from the previous sibling goes instead.
///
/// Returns `Ok(None)` if the key is absent.
///
/// # Errors
/// Returns `Error::UnbalancedBraces` if the section never closes.
///
/// # Example
/// ```
/// use pack_docs::registry::remove_section;
///
/// let doc = "{\n  \"a\": {},\n  \"b\": {}\n}";
/// let result = remove_section(doc, "a").unwrap().unwrap();
/// assert_eq!(result, "{\n  \"b\": {}\n}");
/// ```
pub fn remove_section(doc: &str, key: &str) -> Result<Option<String>> {
    let Some((anchor_start, _, close)) = find_section(doc, key)? else {
        return Ok(None);
    };
    let bytes = doc.as_bytes();

    let mut start = anchor_start;
    while start > 0 && bytes[start - 1].is_ascii_whitespace() {
        start -= 1;
    }

    let mut end = close + 1;
    let mut probe = end;
    while probe < bytes.len() && bytes[probe].is_ascii_whitespace() {
        probe += 1;
    }

    if probe < bytes.len() && bytes[probe] == b',' {
        end = probe + 1;
    } else if start > 0 && bytes[start - 1] == b',' {
        start -= 1;
    }

    debug!(key, start, end, "removed registry section");
    let mut result = String::with_capacity(doc.len() - (end - start));
    result.push_str(&doc[..start]);
    result.push_str(&doc[end..]);
    Ok(Some(result))
}

/// Inserts `block` as the first member of the `container` object.
///
/// A comma follows the new block when sibling keys follow it, and precedes
/// it when the text before the insertion point is not the bare opening brace.
///
/// # Errors
/// Returns `Error::AnchorMissing` if no `"container": {` exists. The registry
/// is then in a shape that must not be guessed at.
pub fn insert_section(doc: &str, container: &str, block: &str) -> Result<String> {
    let insert_at = find_container_body(doc, container).ok_or_else(|| Error::AnchorMissing {
        anchor: format!("\"{}\"", container),
        document: "profile registry".to_string(),
    })?;

    let (before, after) = doc.split_at(insert_at);

    let mut to_insert = String::with_capacity(block.len() + 2);
    if !before.trim_end().ends_with('{') {
        to_insert.push(',');
    }
    to_insert.push_str(block);
    if after.trim_start().starts_with('"') {
        to_insert.push(',');
    }

    Ok(format!("{}\n{}{}", before, to_insert, after))
}

/// Offset just past the opening brace of `"container" : {`.
fn find_container_body(doc: &str, container: &str) -> Option<usize> {
    let anchor = format!("\"{}\"", container);
    let bytes = doc.as_bytes();

    let mut from = 0;
    while let Some(pos) = doc[from..].find(&anchor) {
        let mut cursor = from + pos + anchor.len();
        while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
            cursor += 1;
        }
        if cursor < bytes.len() && bytes[cursor] == b':' {
            cursor += 1;
            while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
                cursor += 1;
            }
            if cursor < bytes.len() && bytes[cursor] == b'{' {
                return Some(cursor + 1);
            }
        }
        from = from + pos + 1;
    }

    None
}

/// Removes every section in `stale_keys` plus `key`, then inserts `block`
/// into `container`.
///
/// Running this twice with the same inputs yields the same document, since
/// the first step always removes what the previous run inserted.
pub fn replace_section<S: AsRef<str>>(
    doc: &str,
    key: &str,
    stale_keys: &[S],
    container: &str,
    block: &str,
) -> Result<String> {
    let mut current = doc.to_string();
    let keys = stale_keys
        .iter()
        .map(|s| -> &str { s.as_ref() })
        .chain(std::iter::once(key));

    for stale in keys {
        if let Some(updated) = remove_section(&current, stale)? {
            current = updated;
        }
    }
    insert_section(&current, container, block)
}

/// A launcher profile rendered as a registry section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntry {
    pub key: String,
    pub name: String,
    pub game_dir: String,
    pub icon: String,
    pub java_args: String,
    pub last_version_id: String,
    pub created: DateTime<Utc>,
}

impl ProfileEntry {
    /// Render the section text, indented for a two-level registry.
    ///
    /// Values are escaped as JSON strings, so Windows paths keep their
    /// backslashes intact.
    pub fn render(&self) -> String {
        let stamp = self
            .created
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        let fields = [
            ("created", stamp.as_str()),
            ("gameDir", self.game_dir.as_str()),
            ("icon", self.icon.as_str()),
            ("javaArgs", self.java_args.as_str()),
            ("lastUsed", stamp.as_str()),
            ("lastVersionId", self.last_version_id.as_str()),
            ("name", self.name.as_str()),
            ("type", "custom"),
        ];

        let body = fields
            .iter()
            .map(|(field, value)| format!("      {}: {}", quote(field), quote(value)))
            .collect::<Vec<_>>()
            .join(",\n");

        format!("    {}: {{\n{}\n    }}", quote(&self.key), body)
    }
}

fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}
