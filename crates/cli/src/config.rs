//! Environment configuration for the command-line front end.
use std::env;
use std::path::{Path, PathBuf};

use anyhow::Result;
use construction_content::ConfigLoader;
use construction_core::ConstructionConfig;

/// Paths the CLI reads its settings and documents from.
#[derive(Clone, Debug)]
pub struct CliConfig {
    /// TOML file with engine settings; defaults apply when unset.
    pub config_path: Option<PathBuf>,
    /// Directory new documents are written to.
    pub data_dir: PathBuf,
}

impl CliConfig {
    /// Construct CLI configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CONSTRUCTION_CONFIG` - Path to a TOML settings file
    /// - `CONSTRUCTION_DATA_DIR` - Document directory (default: platform data dir)
    pub fn from_env() -> Self {
        Self {
            config_path: read_env("CONSTRUCTION_CONFIG"),
            data_dir: read_env("CONSTRUCTION_DATA_DIR").unwrap_or_else(default_data_dir),
        }
    }

    /// Engine settings from `config_path`, or the defaults.
    pub fn settings(&self) -> Result<ConstructionConfig> {
        match &self.config_path {
            Some(path) => {
                tracing::debug!("loading settings from {}", path.display());
                ConfigLoader::load(path)
            }
            None => Ok(ConstructionConfig::default()),
        }
    }

    /// Where a document called `name` goes when no output path is given.
    pub fn document_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(file_stem(name)).with_extension("json")
    }
}

/// Platform data directory, e.g. `~/.local/share/construct` on Linux.
fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "construct")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| Path::new("designs").to_path_buf())
}

fn file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() { "untitled".to_string() } else { stem }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: From<String>,
{
    env::var(key).ok().filter(|value| !value.is_empty()).map(T::from)
}
