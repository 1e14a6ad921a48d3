//! [`TestGameDir`] scratch directory for reconciliation scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary game directory with helpers for seeding files and asserting
/// on the result of a run.
///
/// # Example
///
/// ```rust
/// use pack_test_utils::TestGameDir;
///
/// let game = TestGameDir::new();
/// game.write("mods/sodium-0.5.jar", "old");
/// game.assert_file_exists("mods/sodium-0.5.jar");
/// assert_eq!(game.list("mods"), vec!["sodium-0.5.jar"]);
/// ```
pub struct TestGameDir {
    temp_dir: TempDir,
}

impl Default for TestGameDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TestGameDir {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("TestGameDir: failed to create temp dir"),
        }
    }

    /// Root of the game directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` under the root.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write a file, creating parent directories.
    pub fn write(&self, relative: &str, contents: impl AsRef<[u8]>) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("TestGameDir::write: create_dir_all failed");
        }
        fs::write(&path, contents).expect("TestGameDir::write: write failed");
    }

    /// Read a file as UTF-8.
    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("TestGameDir::read: {}: {}", relative, e))
    }

    /// Sorted names of the regular files directly inside `relative`.
    pub fn list(&self, relative: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path(relative))
            .unwrap_or_else(|e| panic!("TestGameDir::list: {}: {}", relative, e))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Assert that `relative` exists as a file.
    pub fn assert_file_exists(&self, relative: &str) {
        assert!(
            self.path(relative).is_file(),
            "expected file to exist: {}",
            relative
        );
    }

    /// Assert that nothing exists at `relative`.
    pub fn assert_missing(&self, relative: &str) {
        assert!(
            !self.path(relative).exists(),
            "expected path to be absent: {}",
            relative
        );
    }
}
