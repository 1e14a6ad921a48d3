//! Executes manifest operations against the game directory.

use std::fs;

use pack_fs::{NormalizedPath, WildcardMatcher};
use tracing::{debug, warn};

use crate::archive::{self, Extraction};
use crate::error::{Error, Result};
use crate::events::{EventSink, SyncEvent};
use crate::fetch::{Fetcher, join_url};
use crate::manifest::ManifestOperation;
use crate::report::ReconciliationReport;

/// Progress is reported after every this many operations.
const PROGRESS_INTERVAL: usize = 5;

/// A matching file that survived a remove operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteFailure {
    pub path: String,
    pub reason: String,
}

/// Result of a remove operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Removal {
    pub deleted: usize,
    /// Matching files that could not be deleted.
    pub failed: Vec<DeleteFailure>,
}

impl Removal {
    /// Fold undeletable files into a single [`Error::Operation`] for
    /// `operation`.
    pub fn into_result(self, operation: &ManifestOperation) -> Result<()> {
        if self.failed.is_empty() {
            return Ok(());
        }
        let reason = self
            .failed
            .iter()
            .map(|f| format!("could not delete {} ({})", f.path, f.reason))
            .collect::<Vec<_>>()
            .join(", ");
        Err(Error::Operation {
            operation: operation.to_string(),
            reason,
        })
    }
}

/// Result of an add operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addition {
    pub bytes: u64,
    /// Present when the download was an archive and has been expanded.
    pub extraction: Option<Extraction>,
}

/// Applies add/remove operations under one root, strictly in order.
pub struct DirectorySynchronizer<'a> {
    root: NormalizedPath,
    base_url: String,
    fetcher: &'a dyn Fetcher,
    sink: &'a dyn EventSink,
}

impl<'a> DirectorySynchronizer<'a> {
    pub fn new(
        root: NormalizedPath,
        base_url: impl Into<String>,
        fetcher: &'a dyn Fetcher,
        sink: &'a dyn EventSink,
    ) -> Self {
        Self {
            root,
            base_url: base_url.into(),
            fetcher,
            sink,
        }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Apply every operation in order, recording each outcome in `report`.
    ///
    /// A failing operation never stops the ones after it.
    pub fn apply_all(&self, operations: &[ManifestOperation], report: &mut ReconciliationReport) {
        let total = operations.len();

        for (index, operation) in operations.iter().enumerate() {
            self.sink.emit(&SyncEvent::OperationStarted {
                index: index + 1,
                total,
                operation: operation.to_string(),
            });

            match self.apply(operation) {
                Ok(()) => report.record_success(),
                Err(e) => {
                    let reason = e.to_string();
                    self.sink.emit(&SyncEvent::OperationFailed {
                        operation: operation.to_string(),
                        reason: reason.clone(),
                    });
                    report.record_failure(operation.to_string(), reason);
                }
            }

            let processed = index + 1;
            if processed % PROGRESS_INTERVAL == 0 {
                self.sink.emit(&SyncEvent::Progress { processed, total });
            }
        }
    }

    /// Apply a single operation.
    pub fn apply(&self, operation: &ManifestOperation) -> Result<()> {
        match operation {
            ManifestOperation::Add { relative_path } => self.apply_add(relative_path).map(|_| ()),
            ManifestOperation::Remove { pattern } => self.apply_remove(pattern)?.into_result(operation),
        }
    }

    /// Delete the regular files in one directory whose names match a pattern.
    ///
    /// `pattern` may carry a directory prefix (`mods/sodium-*.jar`). A missing
    /// directory is not an error. Files that cannot be deleted are reported,
    /// skipped and listed in [`Removal::failed`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::TraversalRejected`] if the directory prefix leaves the
    /// root, or an I/O error if the directory cannot be listed.
    pub fn apply_remove(&self, pattern: &str) -> Result<Removal> {
        let normalized = pattern.replace('\\', "/");
        let (directory, name_pattern) = match normalized.rsplit_once('/') {
            Some((dir, name)) => (self.resolve(dir)?, name),
            None => (self.root.clone(), normalized.as_str()),
        };

        if !directory.is_dir() {
            self.sink.emit(&SyncEvent::DirectoryMissing {
                path: directory.to_string(),
            });
            return Ok(Removal::default());
        }

        let matcher = WildcardMatcher::compile(name_pattern);
        let native = directory.to_native();
        let entries = fs::read_dir(&native).map_err(|e| Error::io(&native, e))?;

        let mut removal = Removal::default();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %directory, error = %e, "could not read directory entry");
                    continue;
                }
            };
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            let name = entry.file_name().to_string_lossy().into_owned();
            if !is_file || !matcher.matches(&name) {
                continue;
            }

            let path = directory.join(&name);
            match fs::remove_file(entry.path()) {
                Ok(()) => {
                    removal.deleted += 1;
                    self.sink.emit(&SyncEvent::FileDeleted {
                        path: path.to_string(),
                    });
                }
                Err(e) => {
                    let failure = DeleteFailure {
                        path: path.to_string(),
                        reason: e.to_string(),
                    };
                    self.sink.emit(&SyncEvent::DeleteFailed {
                        path: failure.path.clone(),
                        reason: failure.reason.clone(),
                    });
                    removal.failed.push(failure);
                }
            }
        }

        debug!(
            pattern,
            deleted = removal.deleted,
            failed = removal.failed.len(),
            "remove applied"
        );
        Ok(removal)
    }

    /// Fetch `relative_path` from the download base into the root.
    ///
    /// A `.zip` download is expanded into the root and then deleted. Entries
    /// that would land outside the root are skipped; the others are still
    /// extracted and the add then fails with [`Error::TraversalRejected`].
    /// An archive that cannot be expanded at all is left in place.
    pub fn apply_add(&self, relative_path: &str) -> Result<Addition> {
        let destination = self.resolve(relative_path)?;

        if let Some(parent) = destination.parent() {
            let native = parent.to_native();
            fs::create_dir_all(&native).map_err(|e| Error::io(&native, e))?;
        }

        let url = join_url(&self.base_url, relative_path);
        let bytes = self.fetcher.fetch_to(&url, &destination)?;
        self.sink.emit(&SyncEvent::Downloaded {
            path: destination.to_string(),
            bytes,
        });

        if !archive::is_archive(&destination) {
            return Ok(Addition {
                bytes,
                extraction: None,
            });
        }

        let extraction = archive::extract_into(&destination, &self.root)?;

        let archive_native = destination.to_native();
        if let Err(e) = fs::remove_file(&archive_native) {
            self.sink.emit(&SyncEvent::DeleteFailed {
                path: destination.to_string(),
                reason: e.to_string(),
            });
        }

        self.sink.emit(&SyncEvent::Extracted {
            archive: destination.to_string(),
            entries: extraction.extracted,
        });
        for entry in &extraction.rejected {
            self.sink.emit(&SyncEvent::EntryRejected {
                archive: destination.to_string(),
                entry: entry.clone(),
            });
        }

        if !extraction.rejected.is_empty() {
            return Err(Error::TraversalRejected {
                path: extraction.rejected.join(", "),
            });
        }

        Ok(Addition {
            bytes,
            extraction: Some(extraction),
        })
    }

    fn resolve(&self, relative: &str) -> Result<NormalizedPath> {
        self.root
            .resolve_under(relative)
            .map_err(|_| Error::TraversalRejected {
                path: relative.to_string(),
            })
    }
}
