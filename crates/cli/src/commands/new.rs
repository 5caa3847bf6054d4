//! Create a default document.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use console::style;
use construction_content::loaders::DocumentLoader;
use construction_content::weapon::WeaponSequence;
use construction_content::{ArtifactDocument, robot, weapon};

use crate::config::CliConfig;
use crate::document::ArtifactKind;

/// Write a new document with default components
#[derive(Parser)]
pub struct New {
    /// Kind of construction to create
    #[arg(value_enum, value_name = "KIND")]
    kind: ArtifactKind,

    /// Name of the construction
    #[arg(short, long)]
    name: String,

    /// Starting tech level (defaults to the configured default)
    #[arg(short, long, value_name = "TL")]
    tech_level: Option<u32>,

    /// Output file (defaults to the data directory)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl New {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let settings = config.settings()?;
        let document = match self.kind {
            ArtifactKind::Weapon => {
                let mut artifact =
                    weapon::new_weapon(&self.name, WeaponSequence::Conventional, &settings)?;
                if let Some(tech_level) = self.tech_level {
                    artifact.context_mut().set_tech_level(tech_level)?;
                }
                artifact.to_document()
            }
            ArtifactKind::Robot => {
                let mut artifact = robot::new_robot(&self.name, &settings)?;
                if let Some(tech_level) = self.tech_level {
                    artifact.context_mut().set_tech_level(tech_level)?;
                }
                artifact.to_document()
            }
        };

        let path = self
            .output
            .unwrap_or_else(|| config.document_path(&self.name));
        DocumentLoader::save(&path, &document)?;
        tracing::info!("created {:?} document '{}'", self.kind, document.name);
        print_created(&path, &document);
        Ok(())
    }
}

fn print_created(path: &std::path::Path, document: &ArtifactDocument) {
    println!(
        "{} {} ({})",
        style("Created").bold().green(),
        style(&document.name).bold(),
        path.display()
    );
    println!("  TL{}", document.tech_level);
}
