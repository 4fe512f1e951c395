//! The `validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;

use super::OutputFormat;
use crate::cache::DocumentCache;
use crate::parser::ParseOptions;
use crate::validator::{CitationStatus, ValidationReport, Validator};

/// Validate every citation in one or more source files.
///
/// Each file gets its own report; the command fails when any link across
/// the given files is classified as an error. Warnings do not affect the
/// exit status.
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Source files to validate
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Root directory bounding link resolution (scope-absolute `/...`
    /// references resolve against it)
    #[arg(long)]
    scope: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl ValidateCommand {
    /// Run validation over every given file.
    ///
    /// # Errors
    ///
    /// Fails if a source file cannot be opened, or, after printing all
    /// reports, if any citation was classified as an error.
    pub async fn execute(self) -> Result<()> {
        let scope = self
            .scope
            .as_deref()
            .map(crate::parser::paths::absolutize)
            .transpose()
            .context("resolving scope directory")?;
        let cache = DocumentCache::with_options(ParseOptions { scope });
        let validator = Validator::new(cache);

        let mut reports = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let report = validator
                .validate_file(file)
                .await
                .with_context(|| format!("validating {}", file.display()))?;
            reports.push(report);
        }

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            }
            OutputFormat::Text => {
                for report in &reports {
                    render_text(report);
                }
            }
        }

        let broken: usize = reports.iter().map(|r| r.summary.errors).sum();
        if broken > 0 {
            bail!("{broken} broken citation(s)");
        }
        Ok(())
    }
}

fn render_text(report: &ValidationReport) {
    println!("{}", report.file.display().to_string().bold());

    for result in &report.results {
        let location = format!("line {}", result.link.line);
        match result.status {
            CitationStatus::Valid => {
                println!("  {} {location}: {}", "✓".green(), result.link.full_match);
            }
            CitationStatus::Error => {
                println!(
                    "  {} {location}: {}: {}",
                    "✗".red(),
                    result.link.full_match,
                    result.error.as_deref().unwrap_or("broken citation")
                );
                if let Some(suggestion) = &result.suggestion {
                    println!("      {}", suggestion.yellow());
                }
            }
            CitationStatus::Warning => {
                println!(
                    "  {} {location}: {}: {}",
                    "⚠".yellow(),
                    result.link.full_match,
                    result.error.as_deref().unwrap_or("suspect citation")
                );
            }
        }
    }

    let summary = &report.summary;
    println!(
        "  {} valid, {} error(s), {} warning(s)\n",
        summary.valid, summary.errors, summary.warnings
    );
}
