//! Loaders for reading engine settings and artifact documents from files.

pub mod config;
pub mod document;

pub use config::ConfigLoader;
pub use document::DocumentLoader;

use std::path::Path;

use anyhow::Context as _;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
