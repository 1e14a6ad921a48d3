//! Computation of the `resourcePacks` settings value.

use pack_fs::{NormalizedPath, WildcardMatcher};
use tracing::{debug, warn};

/// Which packs to enable, in which order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePackRules {
    /// Entries that always lead the list, e.g. `vanilla`.
    pub prefix: Vec<String>,
    /// Glob patterns in priority order; each contributes at most one file.
    pub priority: Vec<String>,
}

/// Build the ordered resource-pack list for the files in `dir`.
///
/// The directory is scanned non-recursively. For each priority pattern the
/// first matching regular file (by name order) is added as `file/<name>`. A
/// missing directory yields just the prefix.
pub fn resource_pack_list(dir: &NormalizedPath, rules: &ResourcePackRules) -> Vec<String> {
    let mut packs = rules.prefix.clone();

    let mut names = match std::fs::read_dir(dir.to_native()) {
        Ok(entries) => entries
            .filter_map(|entry| {
                entry
                    .inspect_err(|e| warn!(dir = %dir, error = %e, "could not read directory entry"))
                    .ok()
            })
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>(),
        Err(e) => {
            warn!(dir = %dir, error = %e, "could not scan resource pack directory");
            Vec::new()
        }
    };
    names.sort();

    for pattern in &rules.priority {
        let matcher = WildcardMatcher::compile(pattern);
        if let Some(name) = names.iter().find(|name| matcher.matches(name)) {
            debug!(pattern = %pattern, name = %name, "selected resource pack");
            packs.push(format!("file/{}", name));
        }
    }

    packs
}

/// Render a pack list as the settings value, e.g. `["vanilla","file/a.zip"]`.
pub fn resource_pack_value(packs: &[String]) -> String {
    serde_json::Value::from(packs.to_vec()).to_string()
}
