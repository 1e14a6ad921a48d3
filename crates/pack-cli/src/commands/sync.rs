//! `packsync sync`: run a full reconciliation.

use std::path::PathBuf;

use colored::Colorize;
use pack_core::{
    DocumentStatus, EventSink, HttpFetcher, ReconciliationDriver, ReconciliationReport, Stage,
    SyncConfig, SyncEvent, TracingSink,
};
use pack_fs::NormalizedPath;

use crate::error::{CliError, Result};

/// Inputs of the sync command after argument parsing.
#[derive(Debug, Clone)]
pub struct SyncArgs {
    pub config: PathBuf,
    pub game_dir: Option<PathBuf>,
    pub base_url: Option<String>,
    pub loader_version: Option<String>,
    pub json: bool,
}

/// Load the configuration and apply command-line overrides.
///
/// A missing configuration file is only acceptable when `--base-url` is
/// given, in which case every other value takes its default.
pub fn resolve_config(args: &SyncArgs) -> Result<SyncConfig> {
    let mut config = if args.config.exists() {
        SyncConfig::load(&args.config)?
    } else if let Some(base_url) = &args.base_url {
        SyncConfig::new(base_url.clone())
    } else {
        return Err(CliError::user(format!(
            "Configuration {} not found; pass --config or --base-url",
            args.config.display()
        )));
    };

    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(game_dir) = &args.game_dir {
        config.game_dir = Some(game_dir.clone());
    }
    if let Some(loader) = &args.loader_version {
        config.loader_version = Some(loader.clone());
    }
    Ok(config)
}

/// Run the sync command
pub fn run_sync(args: &SyncArgs) -> Result<()> {
    let config = resolve_config(args)?;
    let game_dir = config.require_game_dir()?.to_native();
    std::fs::create_dir_all(&game_dir)?;
    let game_dir = NormalizedPath::canonical(&game_dir)?;

    let fetcher = HttpFetcher::new(&config.network)?;
    let console = ConsoleSink;
    let sink: &dyn EventSink = if args.json { &TracingSink } else { &console };

    if !args.json {
        println!(
            "{} Reconciling {} from {}",
            "=>".blue().bold(),
            game_dir.to_string().cyan(),
            config.base_url
        );
    }

    let mut driver = ReconciliationDriver::new(&config, game_dir, &fetcher, sink);
    let report = driver.run()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.stage == Stage::Failed {
        return Err(CliError::user("Reconciliation failed; see the report above"));
    }
    Ok(())
}

fn print_report(report: &ReconciliationReport) {
    println!();
    println!(
        "{} {} attempted, {} succeeded, {} failed",
        "Operations:".bold(),
        report.attempted,
        report.succeeded.to_string().green(),
        if report.failed == 0 {
            report.failed.to_string().normal()
        } else {
            report.failed.to_string().red()
        }
    );
    for failure in &report.failures {
        println!("   {} {}: {}", "!".red(), failure.operation.cyan(), failure.reason);
    }

    for document in &report.documents {
        let (label, detail) = match &document.status {
            DocumentStatus::Patched { detail } => ("OK".green().bold(), detail.as_str()),
            DocumentStatus::Unchanged => ("OK".green().bold(), "unchanged"),
            DocumentStatus::Skipped { reason } => ("SKIP".yellow().bold(), reason.as_str()),
            DocumentStatus::Failed { reason } => ("FAILED".red().bold(), reason.as_str()),
        };
        println!("{} {}: {}", label, document.document, detail);
    }

    if report.stage == Stage::Done {
        println!();
        if report.has_document_failures() {
            println!(
                "{} Reconciliation complete; some documents were not patched.",
                "WARN".yellow().bold()
            );
        } else {
            println!("{} Reconciliation complete.", "OK".green().bold());
        }
    }
}

/// Prints run progress for a person at a terminal.
struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn emit(&self, event: &SyncEvent) {
        match event {
            SyncEvent::ManifestFetched {
                operations,
                skipped,
                ..
            } => println!(
                "{} Manifest: {} operation(s), {} skipped line(s)",
                "=>".blue().bold(),
                operations,
                skipped
            ),
            SyncEvent::OperationStarted {
                index,
                total,
                operation,
            } => println!("   [{}/{}] {}", index, total, operation),
            SyncEvent::OperationFailed { reason, .. } => {
                println!("   {} {}", "!".red(), reason)
            }
            SyncEvent::FileDeleted { path } => println!("   {} {}", "-".red(), path.dimmed()),
            SyncEvent::DeleteFailed { path, reason } => {
                println!("   {} {}: {}", "!".yellow(), path, reason)
            }
            SyncEvent::Extracted { archive, entries } => {
                println!("   {} {} entries from {}", "+".green(), entries, archive.dimmed())
            }
            SyncEvent::EntryRejected { entry, .. } => {
                println!("   {} rejected archive entry {}", "!".red(), entry)
            }
            SyncEvent::Progress { processed, total } => {
                println!("{} {}/{} processed", "=>".blue().bold(), processed, total)
            }
            _ => {}
        }
        TracingSink.emit(event);
    }
}
