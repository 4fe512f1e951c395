//! Markdown parsing: one file's raw text in, a structural contract out.
//!
//! The parser produces [`ParserOutput`]: headings, anchors (header and
//! block variants), and outgoing links, each with 1-based source positions.
//! Parsing is lenient (malformed markdown degrades to fewer extracted
//! items, never an error) and pure: identical bytes always yield identical
//! output, which is what makes cache entries trustworthy.
//!
//! Block/inline structure comes from `pulldown-cmark`; the wiki, caret, and
//! citation syntaxes it does not model are matched by the scanners in
//! [`links`]. Only the I/O in [`parse_file`] can fail.

pub mod links;
pub mod paths;
pub mod types;

use std::ops::Range;
use std::path::{Path, PathBuf};

use pulldown_cmark::{Event, HeadingLevel, Options, Parser as MarkdownParser, Tag, TagEnd};
use tracing::debug;

use crate::core::{CiteError, Result};
pub use types::{
    Anchor, AnchorKind, ExtractionMarker, Heading, Link, LinkType, ParserOutput, Scope, Target,
};

/// Knobs for a parse pass.
///
/// `scope` restricts relative-name resolution to a root directory; links
/// whose normalized targets escape it resolve to `None` and are reported by
/// the validator as path-resolution errors.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Root directory bounding link-target resolution
    pub scope: Option<PathBuf>,
}

/// Read and parse the file at `path`.
///
/// # Errors
///
/// [`CiteError::FileNotFound`] if the path does not resolve to a file,
/// [`CiteError::ReadError`] on any other I/O failure. Content-level problems
/// never error.
pub async fn parse_file(path: &Path, options: &ParseOptions) -> Result<ParserOutput> {
    let file_path = paths::absolutize(path)?;
    let content = tokio::fs::read_to_string(&file_path)
        .await
        .map_err(|e| CiteError::from_io(&file_path, &e))?;
    Ok(parse_content(file_path, content, options))
}

/// Parse already-loaded content. Pure function of its inputs.
#[must_use]
pub fn parse_content(file_path: PathBuf, content: String, options: &ParseOptions) -> ParserOutput {
    let (headings, mut anchors) = extract_headings(&content);
    anchors.extend(links::extract_block_anchors(&content));
    anchors.sort_by_key(|a| (a.line(), a.column()));
    let links = links::extract_links(&file_path, options.scope.as_deref(), &content);

    debug!(
        file = %file_path.display(),
        links = links.len(),
        headings = headings.len(),
        anchors = anchors.len(),
        "parsed document"
    );

    ParserOutput {
        file_path,
        content,
        links,
        headings,
        anchors,
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Byte offsets where each line begins, for offset-to-position conversion.
fn line_starts(content: &str) -> Vec<usize> {
    let mut starts = vec![0];
    starts.extend(
        content
            .bytes()
            .enumerate()
            .filter_map(|(i, b)| (b == b'\n').then_some(i + 1)),
    );
    starts
}

/// Convert a byte offset to a 1-based (line, column) pair.
fn position_at(starts: &[usize], offset: usize) -> (usize, usize) {
    let line_idx = match starts.binary_search(&offset) {
        Ok(i) => i,
        Err(i) => i - 1,
    };
    (line_idx + 1, offset - starts[line_idx] + 1)
}

/// Tokenize headings and derive a dual-ID header anchor for each.
fn extract_headings(content: &str) -> (Vec<Heading>, Vec<Anchor>) {
    let mut headings = Vec::new();
    let mut anchors = Vec::new();
    let starts = line_starts(content);

    let parser = MarkdownParser::new_ext(content, Options::empty());
    let mut current: Option<(HeadingLevel, Range<usize>, String)> = None;

    for (event, range) in parser.into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((level, range, String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, buffer)) = current.as_mut() {
                    buffer.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, span, text)) = current.take() {
                    let raw = content[span.start..span.end].trim_end().to_string();
                    let text = text.trim().to_string();
                    let (line, column) = position_at(&starts, span.start);

                    anchors.push(Anchor::Header {
                        id: text.clone(),
                        url_encoded_id: paths::slugify(&text),
                        raw_text: text.clone(),
                        full_match: raw.clone(),
                        line,
                        column,
                    });
                    headings.push(Heading {
                        level: heading_level(level),
                        text,
                        raw,
                    });
                }
            }
            _ => {}
        }
    }

    (headings, anchors)
}
