//! Load a document and print what it builds.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use construction_content::Artifact;
use construction_core::{Calculated, Domain, Manifest};
use strum::IntoEnumIterator;

use crate::config::CliConfig;
use crate::document::{ArtifactKind, LoadedArtifact};

/// Print the manifest and attributes of a document
#[derive(Parser)]
pub struct Show {
    /// Document to load
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,

    /// Domain of the document (detected when omitted)
    #[arg(short, long, value_enum)]
    kind: Option<ArtifactKind>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Manifest sections, totals, attributes and incomplete stages
    Summary,
    /// The normalised document as JSON
    Json,
    /// Summary plus the derivation of every total
    Explain,
}

impl Show {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let settings = config.settings()?;
        match LoadedArtifact::load(&self.file, self.kind, &settings)? {
            LoadedArtifact::Weapon(artifact) => show(&artifact, self.format),
            LoadedArtifact::Robot(artifact) => show(&artifact, self.format),
        }
    }
}

fn show<D: Domain>(artifact: &Artifact<D>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&artifact.to_document())
                .context("failed to serialise document")?;
            println!("{json}");
        }
        OutputFormat::Summary => print_summary(artifact),
        OutputFormat::Explain => {
            print_summary(artifact);
            print_explanation(&artifact.context().manifest());
        }
    }
    Ok(())
}

fn print_summary<D: Domain>(artifact: &Artifact<D>) {
    let context = artifact.context();
    println!(
        "{} ({} at TL{})",
        style(artifact.name()).bold().cyan(),
        D::NAME,
        context.tech_level()
    );
    if !context.rules().is_empty() {
        let rules: Vec<String> = context.rules().iter().map(ToString::to_string).collect();
        println!("{} {}", style("Rules:").bold(), rules.join(", "));
    }
    println!();

    let manifest = context.manifest();
    for section in manifest.sections() {
        println!("{}", style(section.name()).bold().yellow());
        for entry in section.entries() {
            let costs: Vec<String> = D::Cost::iter()
                .filter_map(|cost| {
                    entry
                        .cost(cost)
                        .map(|_| format!("{cost} {}", entry.cost_string(cost)))
                })
                .collect();
            println!("  {}  {}", entry.description(), style(costs.join(", ")).dim());
            for factor in entry.factors() {
                println!("    {factor}");
            }
            for note in entry.notes() {
                println!("    {} {note}", style("Note:").italic());
            }
        }
    }
    println!();

    println!("{}", style("Totals").bold().green());
    for (cost, total) in manifest.totals() {
        match total {
            Calculated::Value(value) => println!("  {cost}: {value}"),
            Calculated::CouldNotCalculate => {
                println!("  {cost}: {}", style("could not calculate").red())
            }
        }
    }

    for sequence in 0..context.sequence_count() {
        let Some(attributes) = context.attributes(sequence) else {
            continue;
        };
        println!();
        println!(
            "{} {} ({})",
            style("Attributes").bold().green(),
            sequence + 1,
            context.sequences()[sequence]
        );
        for (attribute, value) in attributes.iter() {
            println!("  {attribute}: {value}");
        }
    }

    let report = context.report();
    if !report.incomplete.is_empty() {
        println!();
        println!("{}", style("Incomplete").bold().red());
        for stage in &report.incomplete {
            let hint = if stage.has_candidates {
                "needs a component"
            } else {
                "no component currently fits"
            };
            println!("  {}: {hint}", stage.stage);
        }
    }
    if !artifact.notes().is_empty() {
        println!();
        println!("{}", style("Notes").bold());
        println!("  {}", artifact.notes());
    }
}

fn print_explanation<D: Domain>(manifest: &Manifest<D>) {
    println!();
    println!("{}", style("Derivation").bold().green());
    for cost in D::Cost::iter() {
        if let Calculated::Value(value) = manifest.resolve_total(cost) {
            print!("{}", value.explain());
        }
    }
}
