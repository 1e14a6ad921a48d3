//! In-memory ZIP archive builder.

use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Builder for a ZIP archive held entirely in memory.
///
/// Entry names are written exactly as given, so fixtures can contain
/// `../` traversal attempts that a well-behaved archiver would refuse.
///
/// # Example
///
/// ```rust
/// use pack_test_utils::ZipFixture;
///
/// let bytes = ZipFixture::new()
///     .dir("config/")
///     .file("config/sodium.json", "{}")
///     .build();
/// assert!(!bytes.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct ZipFixture {
    entries: Vec<(String, Option<Vec<u8>>)>,
}

impl ZipFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file entry.
    pub fn file(mut self, name: &str, contents: impl AsRef<[u8]>) -> Self {
        self.entries
            .push((name.to_string(), Some(contents.as_ref().to_vec())));
        self
    }

    /// Add a directory entry.
    pub fn dir(mut self, name: &str) -> Self {
        self.entries.push((name.to_string(), None));
        self
    }

    /// Serialize the archive.
    pub fn build(self) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        for (name, contents) in self.entries {
            match contents {
                Some(bytes) => {
                    writer
                        .start_file(name.as_str(), options)
                        .expect("ZipFixture: start_file failed");
                    writer
                        .write_all(&bytes)
                        .expect("ZipFixture: write failed");
                }
                None => {
                    writer
                        .add_directory(name.as_str(), options)
                        .expect("ZipFixture: add_directory failed");
                }
            }
        }

        writer
            .finish()
            .expect("ZipFixture: finish failed")
            .into_inner()
    }
}
