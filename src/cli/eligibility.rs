//! The `eligibility` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use super::OutputFormat;
use crate::cache::DocumentCache;
use crate::extraction::{Decision, EligibilityChain, ExtractionFlags};
use crate::parser::{Link, ParseOptions};

/// Report the extraction decision for every link in a file.
///
/// The decisions feed an external aggregation step; this command only shows
/// which links would be pulled and which rule decided.
#[derive(Debug, Args)]
pub struct EligibilityCommand {
    /// Source file to inspect
    file: PathBuf,

    /// Allow extraction of whole files (links without an anchor)
    #[arg(long)]
    full_files: bool,

    /// Root directory bounding link resolution
    #[arg(long)]
    scope: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct EligibilityEntry {
    link: Link,
    #[serde(flatten)]
    decision: Decision,
}

impl EligibilityCommand {
    /// Evaluate the chain for every link in the file.
    ///
    /// # Errors
    ///
    /// Fails if the source file cannot be opened.
    pub async fn execute(self) -> Result<()> {
        let scope = self
            .scope
            .as_deref()
            .map(crate::parser::paths::absolutize)
            .transpose()
            .context("resolving scope directory")?;
        let cache = DocumentCache::with_options(ParseOptions { scope });
        let document = cache
            .resolve(&self.file)
            .await
            .with_context(|| format!("parsing {}", self.file.display()))?;

        let chain = EligibilityChain::standard();
        let flags = ExtractionFlags {
            full_files: self.full_files,
        };

        let entries: Vec<EligibilityEntry> = document
            .links()
            .iter()
            .map(|link| EligibilityEntry {
                link: link.clone(),
                decision: chain.evaluate(link, &flags),
            })
            .collect();

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
            OutputFormat::Text => {
                println!("{}", document.file_path().display().to_string().bold());
                for entry in &entries {
                    let verdict = if entry.decision.eligible {
                        "extract".green()
                    } else {
                        "skip".red()
                    };
                    println!(
                        "  {verdict} line {}: {} ({})",
                        entry.link.line, entry.link.full_match, entry.decision.reason
                    );
                }
            }
        }
        Ok(())
    }
}
