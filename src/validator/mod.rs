//! Per-file citation validation.
//!
//! [`Validator::validate_file`] resolves the source document through the
//! [`DocumentCache`], walks every outgoing link, and classifies each one as
//! valid, error, or warning. The source file failing to open is the only
//! fatal condition; every target-side problem is captured as data in the
//! report so one broken link never hides the rest.
//!
//! Anchor existence is checked with backward-compatible tolerance: the raw
//! fragment, its percent-decoded form, and block-reference alias forms
//! (with and without the leading caret) all resolve to the same anchor.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::cache::DocumentCache;
use crate::core::{CiteError, Result};
use crate::document::ParsedDocument;
use crate::parser::{AnchorKind, Link, LinkType};

/// Outcome class for one link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationStatus {
    /// The reference resolves
    Valid,
    /// The reference is broken
    Error,
    /// The reference is suspect but not definitively broken
    Warning,
}

/// One link's classified outcome.
#[derive(Debug, Clone, Serialize)]
pub struct CitationResult {
    /// The link as extracted from source
    pub link: Link,
    /// Outcome class
    pub status: CitationStatus,
    /// Human-readable problem description, for error/warning outcomes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human-readable correction hint, when close matches exist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Tallies over a file's link outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Links that resolved
    pub valid: usize,
    /// Links that are broken
    pub errors: usize,
    /// Links flagged as suspect
    pub warnings: usize,
}

/// The complete validation outcome for one source file.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// The validated source file
    pub file: PathBuf,
    /// Outcome tallies
    pub summary: Summary,
    /// Per-link outcomes, in source order
    pub results: Vec<CitationResult>,
}

impl ValidationReport {
    /// Whether any link in the file was classified as an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }
}

/// Walks a document's links and classifies each against its target.
#[derive(Debug, Clone)]
pub struct Validator {
    cache: DocumentCache,
}

impl Validator {
    /// Create a validator backed by `cache`.
    #[must_use]
    pub fn new(cache: DocumentCache) -> Self {
        Self { cache }
    }

    /// The cache this validator resolves documents through.
    #[must_use]
    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    /// Validate every outgoing link of `path`.
    ///
    /// # Errors
    ///
    /// Fails fast with [`CiteError::FileNotFound`] (or
    /// [`CiteError::ReadError`]) when the source file itself cannot be
    /// opened. Target-side failures never propagate; they become per-link
    /// error results.
    pub async fn validate_file(&self, path: &Path) -> Result<ValidationReport> {
        let source = self.cache.resolve(path).await?;
        debug!(file = %source.file_path().display(), links = source.links().len(), "validating");

        let mut results = Vec::with_capacity(source.links().len());
        let mut summary = Summary::default();

        for link in source.links() {
            let result = self.validate_single_citation(link).await;
            match result.status {
                CitationStatus::Valid => summary.valid += 1,
                CitationStatus::Error => summary.errors += 1,
                CitationStatus::Warning => summary.warnings += 1,
            }
            results.push(result);
        }

        Ok(ValidationReport {
            file: source.file_path().to_path_buf(),
            summary,
            results,
        })
    }

    /// Classify one link against its target document.
    async fn validate_single_citation(&self, link: &Link) -> CitationResult {
        let Some(target_path) = link.target.path.clone() else {
            let failure = CiteError::PathResolutionFailure {
                reference: link.target.raw.clone(),
                source_file: link.source_path.display().to_string(),
            };
            return CitationResult {
                link: link.clone(),
                status: CitationStatus::Error,
                error: Some(failure.to_string()),
                suggestion: None,
            };
        };

        let target = match self.cache.resolve(&target_path).await {
            Ok(target) => target,
            Err(err) => {
                // Target-side open failures are per-link outcomes, not
                // validation aborts.
                return CitationResult {
                    link: link.clone(),
                    status: CitationStatus::Error,
                    error: Some(format!(
                        "{} target cannot be read: {err}",
                        syntax_flavor(link)
                    )),
                    suggestion: None,
                };
            }
        };

        // Whole-file links are valid once the target file resolves.
        let Some(anchor) = link.target.anchor.as_deref() else {
            return CitationResult {
                link: link.clone(),
                status: CitationStatus::Valid,
                error: None,
                suggestion: None,
            };
        };

        if anchor_exists(&target, anchor) {
            return CitationResult {
                link: link.clone(),
                status: CitationStatus::Valid,
                error: None,
                suggestion: None,
            };
        }

        let suggestion = build_suggestion(&target, link, anchor);
        let status = if link.link_type == LinkType::Citation {
            // A citation without a matching definition may be completed
            // later; flag it without failing the file.
            CitationStatus::Warning
        } else {
            CitationStatus::Error
        };

        CitationResult {
            link: link.clone(),
            status,
            error: Some(format!(
                "{} anchor '{anchor}' not found in {}",
                syntax_flavor(link),
                target.file_path().display()
            )),
            suggestion,
        }
    }
}

/// Check `anchor` against the target's anchors, tolerating the encoded and
/// caret-alias spellings of the same anchor.
fn anchor_exists(target: &ParsedDocument, anchor: &str) -> bool {
    if target.has_anchor(anchor) {
        return true;
    }
    if let Some(stripped) = anchor.strip_prefix('^') {
        if target.has_anchor(stripped) {
            return true;
        }
    }
    if let Ok(decoded) = urlencoding::decode(anchor) {
        if decoded != anchor {
            if target.has_anchor(&decoded) {
                return true;
            }
            if let Some(stripped) = decoded.strip_prefix('^') {
                if target.has_anchor(stripped) {
                    return true;
                }
            }
        }
    }
    false
}

/// Assemble the correction hint for a missing anchor.
fn build_suggestion(target: &ParsedDocument, link: &Link, anchor: &str) -> Option<String> {
    let query = anchor.strip_prefix('^').unwrap_or(anchor);
    let similar = target.find_similar_anchors(query);

    let mut parts = Vec::new();
    if let Some(best) = similar.first() {
        parts.push(format!("did you mean '{best}'?"));
        if similar.len() > 1 {
            parts.push(format!("similar anchors: {}", similar.join(", ")));
        }
    }

    if link.anchor_type == Some(AnchorKind::Header) {
        let headings = target.find_similar_headings(query);
        if !headings.is_empty() {
            parts.push(format!("closest headings: {}", headings.join(", ")));
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Describe the link's surface syntax for message phrasing only; this never
/// changes the pass/fail outcome.
fn syntax_flavor(link: &Link) -> &'static str {
    match link.link_type {
        LinkType::BlockReference => "block reference",
        LinkType::Citation => "citation",
        _ if is_emphasis_wrapped(&link.text) => "emphasized link",
        _ => "link",
    }
}

fn is_emphasis_wrapped(text: &str) -> bool {
    text.len() > 1
        && ((text.starts_with('*') && text.ends_with('*'))
            || (text.starts_with('_') && text.ends_with('_')))
}
