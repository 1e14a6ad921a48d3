//! Filesystem primitives for packsync
//!
//! Provides root-contained path resolution, atomic I/O and the glob-style
//! wildcard matcher used to select files for deletion.

pub mod error;
pub mod io;
pub mod path;
pub mod wildcard;

pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use wildcard::WildcardMatcher;
