//! End-to-end reconciliation run.
//!
//! ```text
//! Idle -> ManifestFetched -> OperationsApplied -> DocumentsPatched -> Done
//!   \            \                  \                   \
//!    +------------+------------------+-------------------+--> Failed
//! ```
//!
//! Only an unusable version header or manifest, or a document missing a
//! required anchor, moves the run to `Failed`. Per-operation failures are
//! recorded in the report and the run carries on.

use std::fs;

use chrono::Utc;
use pack_docs::{
    ProfileEntry, ServerEntry, SettingsOutcome, ensure_server, patch_settings, replace_section,
    resource_pack_list, resource_pack_value,
};
use pack_fs::NormalizedPath;
use tracing::{debug, info};

use crate::config::{SyncConfig, expand, resolve_document};
use crate::error::{Error, FatalManifest, Result};
use crate::events::{EventSink, SyncEvent};
use crate::fetch::{Fetcher, join_url};
use crate::manifest::Manifest;
use crate::report::{DocumentKind, DocumentStatus, ReconciliationReport, Stage};
use crate::synchronizer::DirectorySynchronizer;
use crate::version::VersionInfo;

/// Settings key whose value is always computed from the installed packs.
pub const RESOURCE_PACKS_KEY: &str = "resourcePacks";

/// Drives one reconciliation run over a game directory.
pub struct ReconciliationDriver<'a> {
    config: &'a SyncConfig,
    game_dir: NormalizedPath,
    fetcher: &'a dyn Fetcher,
    sink: &'a dyn EventSink,
    stage: Stage,
}

impl<'a> ReconciliationDriver<'a> {
    pub fn new(
        config: &'a SyncConfig,
        game_dir: NormalizedPath,
        fetcher: &'a dyn Fetcher,
        sink: &'a dyn EventSink,
    ) -> Self {
        Self {
            config,
            game_dir,
            fetcher,
            sink,
            stage: Stage::Idle,
        }
    }

    /// Current state of the run.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn transition(&mut self, stage: Stage) {
        debug!(from = ?self.stage, to = ?stage, "driver transition");
        self.stage = stage;
        self.sink.emit(&SyncEvent::StageReached(stage));
    }

    /// Run the whole reconciliation.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the driver in [`Stage::Failed`], when the
    /// version header or manifest cannot be fetched or read, or when the
    /// updater is outdated. Document failures never return an error. A
    /// document missing a required anchor ends the run in `Failed`; any other
    /// document failure is only recorded in the report.
    pub fn run(&mut self) -> Result<ReconciliationReport> {
        let mut report = ReconciliationReport::default();

        let (version, manifest) = match self.fetch_manifest() {
            Ok(fetched) => fetched,
            Err(e) => {
                self.transition(Stage::Failed);
                return Err(e);
            }
        };
        report.minecraft_version = Some(version.minecraft.clone());
        report.skipped_lines = manifest.skipped.len();
        self.transition(Stage::ManifestFetched);

        let synchronizer = DirectorySynchronizer::new(
            self.game_dir.clone(),
            self.config.base_url.clone(),
            self.fetcher,
            self.sink,
        );
        synchronizer.apply_all(&manifest.operations, &mut report);
        self.transition(Stage::OperationsApplied);

        if self.patch_documents(&version, &mut report) {
            self.transition(Stage::Failed);
        } else {
            self.transition(Stage::DocumentsPatched);
            self.transition(Stage::Done);
        }

        report.stage = self.stage;
        info!(
            attempted = report.attempted,
            succeeded = report.succeeded,
            failed = report.failed,
            stage = ?report.stage,
            "reconciliation finished"
        );
        Ok(report)
    }

    /// Fetch the version header, then download and parse the manifest it
    /// selects.
    pub fn fetch_manifest(&self) -> Result<(VersionInfo, Manifest)> {
        let version_url = join_url(&self.config.base_url, &self.config.version_document);
        let header = self
            .fetcher
            .fetch_text(&version_url)
            .map_err(|e| manifest_unreachable(&version_url, e))?;
        let version = VersionInfo::parse(&header)?;
        info!(minecraft = %version.minecraft, latest = %version.latest_updater, "version header read");

        if let Some(running) = &self.config.updater_version
            && version.updater_outdated(running)
        {
            return Err(Error::UpdaterOutdated {
                running: running.clone(),
                latest: version.latest_updater.clone(),
            });
        }

        let name = expand(&self.config.manifest_name, &version.minecraft, "");
        let local = self.game_dir.resolve_under(&name)?;
        let native = local.to_native();
        if let Err(e) = fs::remove_file(&native)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            return Err(Error::io(&native, e));
        }

        let manifest_url = join_url(&self.config.base_url, &name);
        self.fetcher
            .fetch_to(&manifest_url, &local)
            .map_err(|e| manifest_unreachable(&manifest_url, e))?;
        let manifest = Manifest::parse(&pack_fs::io::read_text(&local)?);

        self.sink.emit(&SyncEvent::ManifestFetched {
            url: manifest_url,
            operations: manifest.len(),
            skipped: manifest.skipped.len(),
        });
        Ok((version, manifest))
    }

    /// Patch every document, recording each outcome. Returns whether a
    /// document was missing a required anchor.
    fn patch_documents(&self, version: &VersionInfo, report: &mut ReconciliationReport) -> bool {
        let steps: [(DocumentKind, Result<DocumentStatus>); 3] = [
            (DocumentKind::ProfileRegistry, self.patch_profile(version)),
            (DocumentKind::ServerList, self.patch_servers()),
            (DocumentKind::Settings, self.patch_settings()),
        ];

        let mut anchor_missing = false;
        for (document, outcome) in steps {
            let status = match outcome {
                Ok(status) => {
                    if let DocumentStatus::Patched { detail } = &status {
                        self.sink.emit(&SyncEvent::DocumentPatched {
                            document,
                            detail: detail.clone(),
                        });
                    }
                    status
                }
                Err(e) => {
                    anchor_missing |= matches!(e, Error::PatchAnchorMissing { .. });
                    let reason = e.to_string();
                    self.sink.emit(&SyncEvent::DocumentFailed {
                        document,
                        reason: reason.clone(),
                    });
                    DocumentStatus::Failed { reason }
                }
            };
            report.record_document(document, status);
        }
        anchor_missing
    }

    /// Replace the managed profile section of the launcher registry.
    fn patch_profile(&self, version: &VersionInfo) -> Result<DocumentStatus> {
        let Some(profile) = &self.config.profile else {
            return Ok(DocumentStatus::Skipped {
                reason: "no profile configured".to_string(),
            });
        };
        let Some(loader) = &self.config.loader_version else {
            return Ok(DocumentStatus::Skipped {
                reason: "loader version unknown".to_string(),
            });
        };

        let path = resolve_document(&self.game_dir, &profile.path);
        if !path.is_file() {
            return Err(Error::PatchAnchorMissing {
                document: path.to_string(),
                anchor: format!("\"{}\"", profile.container),
            });
        }

        let minecraft = version.minecraft.as_str();
        let entry = ProfileEntry {
            key: profile.key.clone(),
            name: expand(&profile.name, minecraft, &profile.key),
            game_dir: self.game_dir.to_native().to_string_lossy().into_owned(),
            icon: profile.icon.clone(),
            java_args: profile.java_args.clone(),
            last_version_id: format!("fabric-loader-{}-{}", loader, minecraft),
            created: Utc::now(),
        };
        let stale: Vec<String> = profile
            .stale_keys
            .iter()
            .map(|key| expand(key, minecraft, &profile.key))
            .collect();

        let doc = pack_fs::io::read_text(&path)?;
        let patched = replace_section(&doc, &profile.key, &stale, &profile.container, &entry.render())
            .map_err(|e| anchor_error(e, &path))?;
        pack_fs::io::write_text(&path, &patched)?;

        Ok(DocumentStatus::Patched {
            detail: format!("{} -> {}", profile.key, entry.last_version_id),
        })
    }

    /// Make sure the configured server is listed.
    fn patch_servers(&self) -> Result<DocumentStatus> {
        let Some(server) = &self.config.server else {
            return Ok(DocumentStatus::Skipped {
                reason: "no server configured".to_string(),
            });
        };

        let path = resolve_document(&self.game_dir, &server.path);
        let entry = ServerEntry::new(server.name.clone(), server.address.clone());
        if ensure_server(&path, &entry)? {
            Ok(DocumentStatus::Patched {
                detail: format!("added {}", server.address),
            })
        } else {
            Ok(DocumentStatus::Unchanged)
        }
    }

    /// Apply the configured overrides plus the computed pack list.
    fn patch_settings(&self) -> Result<DocumentStatus> {
        let settings = &self.config.settings;
        let path = resolve_document(&self.game_dir, &settings.path);
        let template = self.config.settings_template(&self.game_dir)?;

        let pack_dir = resolve_document(&self.game_dir, &settings.resource_packs.directory);
        let packs = resource_pack_list(&pack_dir, &settings.resource_packs.rules());

        let mut overrides = settings.overrides.clone();
        overrides.insert(RESOURCE_PACKS_KEY.to_string(), resource_pack_value(&packs));

        let detail = match patch_settings(&path, &template, &overrides)? {
            SettingsOutcome::Seeded => "seeded from template".to_string(),
            SettingsOutcome::Patched { replaced } => format!("replaced {} line(s)", replaced),
        };
        Ok(DocumentStatus::Patched { detail })
    }
}

fn manifest_unreachable(url: &str, error: Error) -> Error {
    FatalManifest::Unreachable {
        url: url.to_string(),
        reason: error.to_string(),
    }
    .into()
}

fn anchor_error(error: pack_docs::Error, path: &NormalizedPath) -> Error {
    match error {
        pack_docs::Error::AnchorMissing { anchor, .. } => Error::PatchAnchorMissing {
            document: path.to_string(),
            anchor,
        },
        pack_docs::Error::UnbalancedBraces { key } => Error::PatchAnchorMissing {
            document: path.to_string(),
            anchor: format!("closing brace of \"{}\"", key),
        },
        other => other.into(),
    }
}
