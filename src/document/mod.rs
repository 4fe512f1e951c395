//! Query facade over one parsed document.
//!
//! [`ParsedDocument`] hides the parser's raw vectors behind stable lookup
//! methods so downstream code never depends on token layout. It owns the two
//! pieces of logic the validator leans on: the dual-ID anchor existence
//! check and fuzzy suggestion generation for near-miss anchors.
//!
//! The fuzzy candidate set cannot change once the document is parsed, so it
//! is built lazily on first use and memoized in a [`OnceLock`].

use std::path::Path;
use std::sync::OnceLock;

use strsim::normalized_levenshtein;

use crate::core::{CiteError, Result};
use crate::parser::{Anchor, Heading, Link, ParserOutput};

/// Minimum normalized similarity for a candidate to be suggested.
///
/// Tuned low enough that partial and prefix queries still surface their
/// intended anchor; not a contract, just a knob.
const SIMILARITY_FLOOR: f64 = 0.3;

/// Maximum number of suggestions returned per query.
const MAX_SUGGESTIONS: usize = 5;

/// Read-only query surface for one parsed file.
pub struct ParsedDocument {
    output: ParserOutput,
    fuzzy_candidates: OnceLock<Vec<String>>,
}

impl ParsedDocument {
    /// Wrap a parser result.
    #[must_use]
    pub fn new(output: ParserOutput) -> Self {
        Self {
            output,
            fuzzy_candidates: OnceLock::new(),
        }
    }

    /// Absolute path of the underlying file.
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.output.file_path
    }

    /// The document's outgoing links, in source order.
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.output.links
    }

    /// The document's headings, in source order.
    #[must_use]
    pub fn headings(&self) -> &[Heading] {
        &self.output.headings
    }

    /// The document's anchors, in source order.
    #[must_use]
    pub fn anchors(&self) -> &[Anchor] {
        &self.output.anchors
    }

    /// Whether `anchor_id` names any anchor in this document.
    ///
    /// Header anchors are checked against both their raw-text `id` and their
    /// slug `url_encoded_id`; block anchors against their single `id`. A
    /// reference written in either form resolves identically.
    #[must_use]
    pub fn has_anchor(&self, anchor_id: &str) -> bool {
        self.output.anchors.iter().any(|a| a.matches(anchor_id))
    }

    /// Rank existing anchor identifiers by similarity to `anchor_id`.
    ///
    /// Scores every known identifier (both forms of each header anchor) with
    /// normalized Levenshtein similarity, discards weak candidates, and
    /// returns at most [`MAX_SUGGESTIONS`] identifiers, best first.
    #[must_use]
    pub fn find_similar_anchors(&self, anchor_id: &str) -> Vec<String> {
        let candidates = self.fuzzy_candidates.get_or_init(|| {
            let mut ids = Vec::new();
            for anchor in &self.output.anchors {
                match anchor {
                    Anchor::Header {
                        id, url_encoded_id, ..
                    } => {
                        ids.push(id.clone());
                        ids.push(url_encoded_id.clone());
                    }
                    Anchor::Block { id, .. } => ids.push(id.clone()),
                }
            }
            let mut seen = std::collections::HashSet::new();
            ids.retain(|id| seen.insert(id.clone()));
            ids
        });

        rank_by_similarity(anchor_id, candidates.iter().map(String::as_str))
    }

    /// Rank header anchors by similarity, reported by display text.
    ///
    /// A richer, type-aware layer on top of [`find_similar_anchors`]: when a
    /// reference looks like a heading, its author wants heading names back,
    /// not slug forms. Both forms of each header participate in scoring.
    #[must_use]
    pub fn find_similar_headings(&self, anchor_id: &str) -> Vec<String> {
        let mut scored: Vec<(f64, &str)> = self
            .output
            .anchors
            .iter()
            .filter_map(|anchor| match anchor {
                Anchor::Header {
                    id,
                    url_encoded_id,
                    raw_text,
                    ..
                } => {
                    let score = normalized_levenshtein(anchor_id, id)
                        .max(normalized_levenshtein(anchor_id, url_encoded_id));
                    (score >= SIMILARITY_FLOOR).then_some((score, raw_text.as_str()))
                }
                Anchor::Block { .. } => None,
            })
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(_, text)| text.to_string())
            .collect()
    }

    /// The document's raw content, unchanged.
    #[must_use]
    pub fn extract_full_content(&self) -> &str {
        &self.output.content
    }

    /// Targeted section extraction. Reserved.
    ///
    /// # Errors
    ///
    /// Always returns [`CiteError::NotImplemented`].
    pub fn extract_section(&self, _heading_text: &str) -> Result<String> {
        Err(CiteError::NotImplemented {
            operation: "section extraction".to_string(),
        })
    }

    /// Targeted block extraction. Reserved.
    ///
    /// # Errors
    ///
    /// Always returns [`CiteError::NotImplemented`].
    pub fn extract_block(&self, _anchor_id: &str) -> Result<String> {
        Err(CiteError::NotImplemented {
            operation: "block extraction".to_string(),
        })
    }
}

impl std::fmt::Debug for ParsedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedDocument")
            .field("file_path", &self.output.file_path)
            .field("links", &self.output.links.len())
            .field("anchors", &self.output.anchors.len())
            .finish()
    }
}

fn rank_by_similarity<'a>(query: &str, candidates: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut scored: Vec<(f64, &str)> = candidates
        .map(|candidate| (normalized_levenshtein(query, candidate), candidate))
        .filter(|(score, _)| *score >= SIMILARITY_FLOOR)
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParseOptions, parse_content};
    use std::path::PathBuf;

    fn doc(content: &str) -> ParsedDocument {
        ParsedDocument::new(parse_content(
            PathBuf::from("/kb/target.md"),
            content.to_string(),
            &ParseOptions::default(),
        ))
    }

    #[test]
    fn has_anchor_accepts_both_header_forms() {
        let doc = doc("# Introduction\n\n## Getting Started\n");
        assert!(doc.has_anchor("Introduction"));
        assert!(doc.has_anchor("introduction"));
        assert!(doc.has_anchor("Getting Started"));
        assert!(doc.has_anchor("getting-started"));
        assert!(!doc.has_anchor("getting_started"));
        assert!(!doc.has_anchor("Conclusion"));
    }

    #[test]
    fn has_anchor_accepts_block_ids() {
        let doc = doc("A fact. ^fact-1\n");
        assert!(doc.has_anchor("fact-1"));
        assert!(!doc.has_anchor("^fact-1"));
    }

    #[test]
    fn typo_suggests_the_real_heading_first() {
        let doc = doc("# Introduction\n\n# Installation\n\n# Usage\n");
        let suggestions = doc.find_similar_anchors("Intruduction");
        assert_eq!(suggestions.first().map(String::as_str), Some("Introduction"));
    }

    #[test]
    fn suggestions_are_bounded_and_sorted() {
        let doc = doc(
            "# Setup One\n# Setup Two\n# Setup Three\n# Setup Four\n# Setup Five\n# Setup Six\n# Setup Seven\n",
        );
        let suggestions = doc.find_similar_anchors("setup");
        assert!(suggestions.len() <= 5);

        let scores: Vec<f64> = suggestions
            .iter()
            .map(|s| normalized_levenshtein("setup", s))
            .collect();
        for pair in scores.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn dissimilar_queries_get_no_suggestions() {
        let doc = doc("# Introduction\n");
        assert!(doc.find_similar_anchors("zzzzzzzzzzzzzzzzzzzz").is_empty());
    }

    #[test]
    fn heading_suggestions_use_display_text() {
        let doc = doc("# Getting Started\n\n# Other Topic\n");
        let suggestions = doc.find_similar_headings("getting-startd");
        assert_eq!(
            suggestions.first().map(String::as_str),
            Some("Getting Started")
        );
    }

    #[test]
    fn reserved_extraction_methods_signal_not_implemented() {
        let doc = doc("# A\n");
        assert!(matches!(
            doc.extract_section("A"),
            Err(CiteError::NotImplemented { .. })
        ));
        assert!(matches!(
            doc.extract_block("b"),
            Err(CiteError::NotImplemented { .. })
        ));
    }

    #[test]
    fn full_content_is_unchanged() {
        let content = "# A\n\nBody text.\n";
        let doc = doc(content);
        assert_eq!(doc.extract_full_content(), content);
    }
}
