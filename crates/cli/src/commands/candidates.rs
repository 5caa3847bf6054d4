//! List what a stage can currently accept.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use construction_content::Artifact;
use construction_core::{Component, Domain};

use crate::config::CliConfig;
use crate::document::{ArtifactKind, LoadedArtifact};

/// List component types compatible with a stage
#[derive(Parser)]
pub struct Candidates {
    /// Document to load
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Stage name, e.g. "Accessories"
    #[arg(short, long)]
    stage: String,

    /// Sequence index; omit for shared stages
    #[arg(long, value_name = "N")]
    sequence: Option<usize>,

    /// Domain of the document (detected when omitted)
    #[arg(short, long, value_enum)]
    kind: Option<ArtifactKind>,
}

impl Candidates {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let settings = config.settings()?;
        let names = match LoadedArtifact::load(&self.file, self.kind, &settings)? {
            LoadedArtifact::Weapon(artifact) => candidates(&artifact, self.sequence, &self.stage)?,
            LoadedArtifact::Robot(artifact) => candidates(&artifact, self.sequence, &self.stage)?,
        };

        println!("{}", style(&self.stage).bold().yellow());
        if names.is_empty() {
            println!("  {}", style("nothing fits").dim());
        }
        for (type_name, display) in names {
            println!("  {type_name:<24} {}", style(display).dim());
        }
        Ok(())
    }
}

/// Type name and display string of every compatible candidate.
fn candidates<D: Domain>(
    artifact: &Artifact<D>,
    sequence: Option<usize>,
    stage: &str,
) -> Result<Vec<(String, String)>> {
    let components = artifact
        .context()
        .candidates(sequence, stage)
        .with_context(|| format!("no stage '{stage}' in {}", artifact.name()))?;
    Ok(components
        .iter()
        .map(|component| (component.type_string(), component.component_string()))
        .collect())
}
