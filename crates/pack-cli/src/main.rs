//! packsync CLI
//!
//! Reconciles a game directory with a published mod pack manifest.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use commands::SyncArgs;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.log_file.as_deref())?;
    if cli.verbose {
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} mod pack reconciler", "packsync".green().bold());
            println!();
            println!("Run {} for available commands.", "packsync --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Sync {
            config,
            game_dir,
            base_url,
            loader_version,
            json,
        } => commands::run_sync(&SyncArgs {
            config,
            game_dir,
            base_url,
            loader_version,
            json,
        }),
        Commands::Manifest { file, json } => commands::run_manifest(&file, json),
    }
}
