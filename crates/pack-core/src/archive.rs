//! ZIP expansion into the game directory.

use std::fs::{self, File};
use std::io::{self, BufReader};

use pack_fs::NormalizedPath;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::error::{Error, Result};

/// Result of expanding one archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Entries written (files and directories).
    pub extracted: usize,
    /// Entry names refused because they would land outside the root.
    pub rejected: Vec<String>,
}

/// Whether the file at `path` is expanded after download.
///
/// Only the `.zip` extension counts, in any case; `.jar` files are also ZIP
/// containers but are installed as-is.
pub fn is_archive(path: &NormalizedPath) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Expand `archive` into `root`, entry by entry.
///
/// An entry whose resolved path is not under `root` is skipped and listed in
/// [`Extraction::rejected`]; every other entry is still extracted.
///
/// # Errors
///
/// Returns an error if the archive cannot be read or an entry cannot be
/// written.
pub fn extract_into(archive: &NormalizedPath, root: &NormalizedPath) -> Result<Extraction> {
    let archive_path = archive.to_native();
    let file = File::open(&archive_path).map_err(|e| Error::io(&archive_path, e))?;
    let mut zip = ZipArchive::new(BufReader::new(file)).map_err(|e| Error::Archive {
        path: archive_path.clone(),
        message: e.to_string(),
    })?;

    let mut extraction = Extraction::default();

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(|e| Error::Archive {
            path: archive_path.clone(),
            message: e.to_string(),
        })?;
        let name = entry.name().to_string();

        let target = match entry.enclosed_name() {
            Some(_) => root.resolve_under(&name).ok(),
            None => None,
        };
        let Some(target) = target else {
            warn!(archive = %archive, entry = %name, "rejecting archive entry outside root");
            extraction.rejected.push(name);
            continue;
        };

        let native = target.to_native();
        if entry.is_dir() {
            fs::create_dir_all(&native).map_err(|e| Error::io(&native, e))?;
        } else {
            if let Some(parent) = native.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            let mut out = File::create(&native).map_err(|e| Error::io(&native, e))?;
            io::copy(&mut entry, &mut out).map_err(|e| Error::io(&native, e))?;
        }

        debug!(entry = %name, "extracted");
        extraction.extracted += 1;
    }

    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_archive_case_insensitive() {
        assert!(is_archive(&NormalizedPath::new("/g/resourcepacks/Pack.ZIP")));
        assert!(is_archive(&NormalizedPath::new("/g/config.zip")));
        assert!(!is_archive(&NormalizedPath::new("/g/mods/sodium.jar")));
        assert!(!is_archive(&NormalizedPath::new("/g/zip")));
    }
}
