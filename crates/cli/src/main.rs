//! Command-line front end for building weapons and robots.
//!
//! ```bash
//! construct new weapon --name "Service Pistol"
//! construct show ~/.local/share/construct/service_pistol.json --format explain
//! construct candidates service_pistol.json --stage Accessories --sequence 0
//! ```

mod commands;
mod config;
mod document;

use anyhow::Result;
use clap::Parser;
use commands::{Candidates, New, Show};
use config::CliConfig;

/// Build and inspect constructions
#[derive(Parser)]
#[command(name = "construct")]
#[command(about = "Build and inspect weapon and robot designs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Create a document with default components
    New(New),

    /// Print the manifest of a document
    Show(Show),

    /// List components a stage can accept
    Candidates(Candidates),
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CliConfig::from_env();
    tracing::debug!("data directory: {}", config.data_dir.display());

    match cli.command {
        Command::New(cmd) => cmd.execute(&config),
        Command::Show(cmd) => cmd.execute(&config),
        Command::Candidates(cmd) => cmd.execute(&config),
    }
}
