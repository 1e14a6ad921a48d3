//! End-to-end tests that invoke the compiled `packsync` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pack_test_utils::TestGameDir;
use tempfile::TempDir;

fn packsync_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_packsync"))
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(packsync_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("PACKSYNC_GAME_DIR")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute packsync binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_help_exits_zero() {
    let temp = TempDir::new().unwrap();
    let out = run(temp.path(), &["--help"]);

    assert!(out.status.success());
    assert!(stdout(&out).contains("sync"));
    assert!(stdout(&out).contains("manifest"));
}

#[test]
fn test_manifest_lists_operations_and_skipped_lines() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("packs.txt"),
        "# header\n-mods/old-*.jar\n+mods/new.jar\n~what\n",
    )
    .unwrap();

    let out = run(temp.path(), &["manifest", "packs.txt"]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("2 operation(s)"));
    assert!(text.contains("mods/old-*.jar"));
    assert!(text.contains("mods/new.jar"));
    assert!(text.contains("line 4"));
}

#[test]
fn test_manifest_json() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("packs.txt"), "+a/b.txt\n-a/*.old\n").unwrap();

    let out = run(temp.path(), &["manifest", "packs.txt", "--json"]);

    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["operations"][0]["op"], "add");
    assert_eq!(json["operations"][0]["relative_path"], "a/b.txt");
    assert_eq!(json["operations"][1]["op"], "remove");
    assert_eq!(json["skipped"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_sync_without_configuration_fails() {
    let temp = TempDir::new().unwrap();
    let out = run(temp.path(), &["sync"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("packsync.toml"));
}

#[test]
fn test_sync_against_server() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/dl/abcd-mods-latest.txt")
        .with_body("1.21.6\n2.3.0\n")
        .create();
    server
        .mock("GET", "/dl/abcd-update-packs-1.21.6.txt")
        .with_body("-mods/*.old\n+mods/new.jar\n")
        .create();
    server
        .mock("GET", "/dl/mods/new.jar")
        .with_body("jar")
        .create();

    let game = TestGameDir::new();
    game.write("mods/a.old", "");
    game.write("options.txt", "lang:en_us\n");

    let work = TempDir::new().unwrap();
    let config = format!(
        "base_url = \"{}/dl/\"\ngame_dir = \"{}\"\n\n[server]\nname = \"Pack\"\naddress = \"mc.example.com\"\n",
        server.url(),
        game.root().display().to_string().replace('\\', "/")
    );
    std::fs::write(work.path().join("packsync.toml"), config).unwrap();

    let out = run(
        work.path(),
        &["--log-file", "packsync.log", "sync", "--json"],
    );

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let report: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(report["stage"], "done");
    assert_eq!(report["succeeded"], 2);
    assert_eq!(report["minecraft_version"], "1.21.6");

    assert_eq!(game.list("mods"), vec!["new.jar"]);
    game.assert_file_exists("servers.dat");
    assert_eq!(game.read("options.txt"), "lang:ja_jp\n");

    let log = std::fs::read_to_string(work.path().join("packsync.log")).unwrap();
    assert!(log.contains("manifest fetched"));
}

#[test]
fn test_sync_reports_failure_exit_code() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/dl/abcd-mods-latest.txt")
        .with_status(500)
        .create();

    let game = TestGameDir::new();
    let work = TempDir::new().unwrap();
    let game_dir = game.root().display().to_string();
    let base_url = format!("{}/dl/", server.url());

    let out = run(
        work.path(),
        &["sync", "--base-url", &base_url, "--game-dir", &game_dir],
    );

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("unreachable"));
}
