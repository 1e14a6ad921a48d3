//! Per-run outcome summary.

use std::fmt;

use serde::Serialize;

/// Driver states, in the order a successful run visits them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Idle,
    ManifestFetched,
    OperationsApplied,
    DocumentsPatched,
    Done,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    ProfileRegistry,
    ServerList,
    Settings,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ProfileRegistry => "profile registry",
            Self::ServerList => "server list",
            Self::Settings => "settings",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    Patched { detail: String },
    Unchanged,
    Skipped { reason: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    pub document: DocumentKind,
    #[serde(flatten)]
    pub status: DocumentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationFailure {
    pub operation: String,
    pub reason: String,
}

/// Report from one reconciliation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    /// Final driver state
    pub stage: Stage,
    /// Game version taken from the version header
    pub minecraft_version: Option<String>,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Manifest lines that were not operations
    pub skipped_lines: usize,
    pub failures: Vec<OperationFailure>,
    pub documents: Vec<DocumentReport>,
}

impl ReconciliationReport {
    pub fn record_success(&mut self) {
        self.attempted += 1;
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, operation: impl Into<String>, reason: impl Into<String>) {
        self.attempted += 1;
        self.failed += 1;
        self.failures.push(OperationFailure {
            operation: operation.into(),
            reason: reason.into(),
        });
    }

    pub fn record_document(&mut self, document: DocumentKind, status: DocumentStatus) {
        self.documents.push(DocumentReport { document, status });
    }

    /// Whether any document patch failed.
    pub fn has_document_failures(&self) -> bool {
        self.documents
            .iter()
            .any(|d| matches!(d.status, DocumentStatus::Failed { .. }))
    }

    pub fn is_success(&self) -> bool {
        self.stage == Stage::Done
    }
}
