//! `packsync manifest`: inspect a manifest without touching anything.

use std::fs;
use std::path::Path;

use colored::Colorize;
use pack_core::{Manifest, ManifestOperation};

use crate::error::{CliError, Result};

/// Parse `file` and print its operations and skipped lines.
pub fn run_manifest(file: &Path, json: bool) -> Result<()> {
    let text = fs::read_to_string(file).map_err(|e| {
        CliError::user(format!("Cannot read manifest {}: {}", file.display(), e))
    })?;
    let manifest = Manifest::parse(&text);

    if json {
        println!("{}", serde_json::to_string_pretty(&manifest)?);
        return Ok(());
    }

    println!(
        "{} {} ({} operation(s))",
        "=>".blue().bold(),
        file.display(),
        manifest.len()
    );
    for operation in &manifest.operations {
        match operation {
            ManifestOperation::Add { relative_path } => {
                println!("   {} {}", "+".green(), relative_path)
            }
            ManifestOperation::Remove { pattern } => println!("   {} {}", "-".red(), pattern),
        }
    }

    if !manifest.skipped.is_empty() {
        println!();
        println!("{} Skipped lines:", "WARN".yellow().bold());
        for skipped in &manifest.skipped {
            println!(
                "   {} line {}: {} ({})",
                "!".yellow(),
                skipped.line,
                skipped.text.dimmed(),
                skipped.reason
            );
        }
    }

    Ok(())
}
