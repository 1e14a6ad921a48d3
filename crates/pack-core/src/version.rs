//! Two-line version header published next to the manifests.
//!
//! ```text
//! 1.21.6        <- target game version, selects the manifest
//! 2.3.0         <- latest updater release
//! ```

use serde::Serialize;

use crate::error::FatalManifest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub minecraft: String,
    pub latest_updater: String,
}

impl VersionInfo {
    /// Parse the header. Trailing blank lines are ignored and each value is
    /// trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`FatalManifest::TooShort`] when fewer than two lines remain.
    pub fn parse(text: &str) -> Result<Self, FatalManifest> {
        let mut lines: Vec<&str> = text.lines().collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        match lines.as_slice() {
            [minecraft, latest, ..] => Ok(Self {
                minecraft: minecraft.trim().to_string(),
                latest_updater: latest.trim().to_string(),
            }),
            _ => Err(FatalManifest::TooShort { lines: lines.len() }),
        }
    }

    /// Whether an updater running `current` must be replaced first.
    pub fn updater_outdated(&self, current: &str) -> bool {
        self.latest_updater != current
    }
}
