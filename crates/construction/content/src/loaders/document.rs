//! Artifact document files.

use std::path::Path;

use anyhow::Context as _;

use crate::artifact::ArtifactDocument;
use crate::loaders::{LoadResult, read_file};

/// Reads and writes [`ArtifactDocument`] JSON files.
pub struct DocumentLoader;

impl DocumentLoader {
    pub fn load(path: &Path) -> LoadResult<ArtifactDocument> {
        let content = read_file(path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse document {}", path.display()))
    }

    /// Writes `document` as pretty JSON, creating parent directories.
    pub fn save(path: &Path, document: &ArtifactDocument) -> LoadResult<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(document)?;
        std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }
}
