//! Subcommand implementations.
//!
//! Each command owns its clap arguments and an `execute` entry point.

mod candidates;
mod new;
mod show;

pub use candidates::Candidates;
pub use new::New;
pub use show::Show;
