//! Shared test fixtures for the packsync workspace.
//!
//! Dev-dependency only, never published.
//!
//! - [`archive`]: in-memory ZIP archives, including hostile entry names
//! - [`game_dir`]: [`TestGameDir`], a scratch game directory with assertions

pub mod archive;
pub mod game_dir;

pub use archive::ZipFixture;
pub use game_dir::TestGameDir;
