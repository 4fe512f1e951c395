//! Command-line interface for mdcite.
//!
//! The CLI is a thin consumer of the library: it wires arguments into the
//! cache/validator/extraction components, renders their reports as text or
//! JSON, and derives the process exit status from the error tally. All
//! citation logic lives in the library modules.
//!
//! # Commands
//!
//! - `validate`: classify every citation in one or more source files
//! - `eligibility`: show the extraction decision for every link in a file
//!
//! ```bash
//! mdcite validate notes/index.md --scope notes
//! mdcite validate notes/index.md --format json
//! mdcite eligibility notes/index.md --full-files
//! ```

mod eligibility;
mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

pub use eligibility::EligibilityCommand;
pub use validate::ValidateCommand;

/// Output rendering for report-producing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored text
    Text,
    /// Machine-readable JSON
    Json,
}

/// Top-level CLI definition.
#[derive(Parser)]
#[command(
    name = "mdcite",
    about = "Validate and extract citations between markdown documents",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (equivalent to RUST_LOG=debug)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all logging except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every citation in the given source files
    Validate(ValidateCommand),

    /// Report extraction eligibility for every link in a file
    Eligibility(EligibilityCommand),
}

impl Cli {
    /// Initialize logging and dispatch to the selected command.
    ///
    /// # Errors
    ///
    /// Propagates command failures; `validate` also fails (after printing
    /// its report) when any citation is broken, so the process exits
    /// non-zero for CI use.
    pub async fn execute(self) -> Result<()> {
        self.init_logging();

        match self.command {
            Commands::Validate(cmd) => cmd.execute().await,
            Commands::Eligibility(cmd) => cmd.execute().await,
        }
    }

    fn init_logging(&self) {
        let default_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
