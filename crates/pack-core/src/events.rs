//! Structured progress events.
//!
//! Components never print. They emit [`SyncEvent`]s into an injected
//! [`EventSink`]; the caller decides whether events end up in a log, on a
//! console or in a test recorder.

use std::cell::RefCell;

use tracing::{debug, info, warn};

use crate::report::{DocumentKind, Stage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    StageReached(Stage),
    ManifestFetched {
        url: String,
        operations: usize,
        skipped: usize,
    },
    OperationStarted {
        index: usize,
        total: usize,
        operation: String,
    },
    OperationFailed {
        operation: String,
        reason: String,
    },
    Progress {
        processed: usize,
        total: usize,
    },
    FileDeleted {
        path: String,
    },
    DeleteFailed {
        path: String,
        reason: String,
    },
    DirectoryMissing {
        path: String,
    },
    Downloaded {
        path: String,
        bytes: u64,
    },
    Extracted {
        archive: String,
        entries: usize,
    },
    EntryRejected {
        archive: String,
        entry: String,
    },
    DocumentPatched {
        document: DocumentKind,
        detail: String,
    },
    DocumentFailed {
        document: DocumentKind,
        reason: String,
    },
}

/// Receiver of [`SyncEvent`]s.
pub trait EventSink {
    fn emit(&self, event: &SyncEvent);
}

/// Forwards every event to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &SyncEvent) {
        match event {
            SyncEvent::StageReached(stage) => debug!(?stage, "stage reached"),
            SyncEvent::ManifestFetched {
                url,
                operations,
                skipped,
            } => info!(url = %url, operations, skipped, "manifest fetched"),
            SyncEvent::OperationStarted {
                index,
                total,
                operation,
            } => info!(index, total, operation = %operation, "applying"),
            SyncEvent::OperationFailed { operation, reason } => {
                warn!(operation = %operation, reason = %reason, "operation failed")
            }
            SyncEvent::Progress { processed, total } => info!(processed, total, "progress"),
            SyncEvent::FileDeleted { path } => info!(path = %path, "deleted file"),
            SyncEvent::DeleteFailed { path, reason } => warn!(path = %path, reason = %reason, "could not delete file"),
            SyncEvent::DirectoryMissing { path } => debug!(path = %path, "directory missing, nothing to delete"),
            SyncEvent::Downloaded { path, bytes } => info!(path = %path, bytes, "downloaded"),
            SyncEvent::Extracted { archive, entries } => info!(archive = %archive, entries, "archive expanded"),
            SyncEvent::EntryRejected { archive, entry } => {
                warn!(archive = %archive, entry = %entry, "archive entry escapes root")
            }
            SyncEvent::DocumentPatched { document, detail } => {
                info!(%document, detail = %detail, "document patched")
            }
            SyncEvent::DocumentFailed { document, reason } => {
                warn!(%document, reason = %reason, "document patch failed")
            }
        }
    }
}

/// Keeps every event in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: RefCell<Vec<SyncEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SyncEvent> {
        self.events.borrow().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &SyncEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
