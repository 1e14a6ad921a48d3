//! Patcher for the flat `key:value` settings file.
//!
//! Known keys are rewritten where they stand; every other line, including
//! lines without a `:` separator, passes through byte for byte. Override keys
//! that do not already appear in the file are not appended.

use std::collections::BTreeMap;

use pack_fs::{NormalizedPath, io};
use tracing::{debug, info};

use crate::error::Result;

/// Ordered lines of a settings document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsDocument {
    lines: Vec<String>,
    line_ending: &'static str,
    trailing_newline: bool,
}

impl SettingsDocument {
    /// Split `text` into lines, remembering the line ending style.
    pub fn parse(text: &str) -> Self {
        let line_ending = if text.contains("\r\n") { "\r\n" } else { "\n" };
        Self {
            lines: text.lines().map(str::to_string).collect(),
            line_ending,
            trailing_newline: text.ends_with('\n'),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Value of the first line whose key is `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| {
            let (k, v) = line.split_once(':')?;
            (k == key).then_some(v)
        })
    }

    /// Replace every line whose key (text before the first `:`) is in
    /// `overrides` with `key:value`. Returns the number of lines replaced.
    pub fn apply(&mut self, overrides: &BTreeMap<String, String>) -> usize {
        let mut replaced = 0;
        for line in &mut self.lines {
            let Some((key, _)) = line.split_once(':') else {
                continue;
            };
            if let Some(value) = overrides.get(key) {
                let rewritten = format!("{}:{}", key, value);
                if *line != rewritten {
                    debug!(key, "overriding setting");
                }
                *line = rewritten;
                replaced += 1;
            }
        }
        replaced
    }

    /// Reassemble the document with its original line ending style.
    pub fn render(&self) -> String {
        let mut text = self.lines.join(self.line_ending);
        if self.trailing_newline && !self.lines.is_empty() {
            text.push_str(self.line_ending);
        }
        text
    }
}

/// What [`patch_settings`] did to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsOutcome {
    /// The file did not exist and was created from the template.
    Seeded,
    /// Existing lines were rewritten.
    Patched { replaced: usize },
}

/// Apply `overrides` to the settings file at `path`.
///
/// A missing file is created as a verbatim copy of `template` and no
/// overrides are applied in that run.
pub fn patch_settings(
    path: &NormalizedPath,
    template: &str,
    overrides: &BTreeMap<String, String>,
) -> Result<SettingsOutcome> {
    if !path.exists() {
        io::write_text(path, template)?;
        info!(path = %path, "seeded settings file from template");
        return Ok(SettingsOutcome::Seeded);
    }

    let mut document = SettingsDocument::parse(&io::read_text(path)?);
    let replaced = document.apply(overrides);

    let dropped: Vec<&str> = overrides
        .keys()
        .filter(|key| document.get(key).is_none())
        .map(String::as_str)
        .collect();
    if !dropped.is_empty() {
        debug!(?dropped, "override keys absent from settings file were not written");
    }

    io::write_text(path, &document.render())?;
    info!(path = %path, replaced, "patched settings file");
    Ok(SettingsOutcome::Patched { replaced })
}
