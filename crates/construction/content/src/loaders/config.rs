//! Engine settings loader.

use std::path::Path;

use anyhow::Context as _;
use construction_core::ConstructionConfig;

use crate::loaders::{LoadResult, read_file};

/// Loads [`ConstructionConfig`] from TOML files.
///
/// Missing keys keep their defaults, so an empty file is a valid config.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<ConstructionConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Parses and validates TOML text.
    pub fn parse(content: &str) -> LoadResult<ConstructionConfig> {
        let config: ConstructionConfig =
            toml::from_str(content).context("failed to parse construction config TOML")?;
        anyhow::ensure!(
            config.min_tech_level <= config.max_tech_level,
            "min_tech_level {} exceeds max_tech_level {}",
            config.min_tech_level,
            config.max_tech_level
        );
        anyhow::ensure!(
            config.contains_tech_level(config.default_tech_level),
            "default_tech_level {} is outside {}..={}",
            config.default_tech_level,
            config.min_tech_level,
            config.max_tech_level
        );
        Ok(config)
    }
}
