//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// packsync - Keep a game directory in line with a published mod pack
#[derive(Parser, Debug)]
#[command(name = "packsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write log output to this file (truncated on start)
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Fetch the manifest, apply it and patch the launcher documents
    ///
    /// Examples:
    ///   packsync sync                              # uses ./packsync.toml
    ///   packsync sync --config pack.toml --json
    ///   packsync sync --base-url https://example.com/downloads/ --game-dir ~/.minecraft_pack
    Sync {
        /// Configuration file
        #[arg(short, long, default_value = "packsync.toml")]
        config: PathBuf,

        /// Game directory (overrides the configuration)
        #[arg(long, env = "PACKSYNC_GAME_DIR")]
        game_dir: Option<PathBuf>,

        /// Download base URL (overrides the configuration)
        #[arg(long)]
        base_url: Option<String>,

        /// Installed mod loader version, used in the launcher profile
        #[arg(long)]
        loader_version: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a local manifest file and list its operations
    Manifest {
        /// Manifest file to inspect
        file: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sync_with_overrides() {
        let cli = Cli::parse_from([
            "packsync",
            "-v",
            "sync",
            "--game-dir",
            "/games/pack",
            "--loader-version",
            "0.16.14",
            "--json",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Sync {
                config,
                game_dir,
                loader_version,
                json,
                ..
            }) => {
                assert_eq!(config, PathBuf::from("packsync.toml"));
                assert_eq!(game_dir, Some(PathBuf::from("/games/pack")));
                assert_eq!(loader_version.as_deref(), Some("0.16.14"));
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parse_manifest_command() {
        let cli = Cli::parse_from(["packsync", "manifest", "packs.txt", "--log-file", "out.log"]);
        assert_eq!(cli.log_file, Some(PathBuf::from("out.log")));
        assert_eq!(
            cli.command,
            Some(Commands::Manifest {
                file: PathBuf::from("packs.txt"),
                json: false
            })
        );
    }
}
