//! Structural types produced by the parser.
//!
//! Everything here is an immutable projection of one file's raw bytes:
//! re-parsing identical content yields identical values, in identical order.
//! The [`Anchor`] union is tagged on `anchor_type` so callers must match the
//! variant before touching header-only fields such as `url_encoded_id`.

use std::path::PathBuf;

use serde::Serialize;

/// The surface syntax a link was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkType {
    /// Plain markdown link: `[text](path#anchor)`
    Markdown,
    /// Wiki-style link: `[[path#anchor|text]]` (including `![[...]]` embeds)
    Wiki,
    /// Caret block reference: `[[path#^block-id]]`
    BlockReference,
    /// Citation-style reference: `[^name]`
    Citation,
}

/// Whether a link stays inside its own file or crosses into another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// Targets an anchor in the same file
    Internal,
    /// Targets another file (optionally with an anchor)
    CrossDocument,
}

/// Discriminant for the two anchor shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorKind {
    /// Heading-derived anchor with dual IDs
    Header,
    /// Inline `^identifier` block anchor with a single ID
    Block,
}

/// A named target location within a file.
///
/// Header anchors carry two equivalent identifiers so links written in
/// either raw-text or slug form resolve identically; block anchors have
/// exactly one. `line` and `column` are 1-based source positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "anchor_type", rename_all = "lowercase")]
pub enum Anchor {
    /// Anchor derived from a markdown heading.
    Header {
        /// Raw heading text, usable verbatim as an anchor reference
        id: String,
        /// Slug form: lower-cased, spaces to hyphens, punctuation stripped
        url_encoded_id: String,
        /// The heading's display text
        raw_text: String,
        /// The full heading line as it appears in source
        full_match: String,
        /// 1-based source line
        line: usize,
        /// 1-based source column
        column: usize,
    },
    /// Anchor declared with the `^identifier` end-of-line marker.
    Block {
        /// The identifier, without the leading caret
        id: String,
        /// The marker as matched in source, including the caret
        full_match: String,
        /// 1-based source line
        line: usize,
        /// 1-based source column
        column: usize,
    },
}

impl Anchor {
    /// The anchor's primary identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Header { id, .. } | Self::Block { id, .. } => id,
        }
    }

    /// 1-based source line of the anchor.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::Header { line, .. } | Self::Block { line, .. } => *line,
        }
    }

    /// 1-based source column of the anchor.
    #[must_use]
    pub fn column(&self) -> usize {
        match self {
            Self::Header { column, .. } | Self::Block { column, .. } => *column,
        }
    }

    /// Which variant this anchor is.
    #[must_use]
    pub fn kind(&self) -> AnchorKind {
        match self {
            Self::Header { .. } => AnchorKind::Header,
            Self::Block { .. } => AnchorKind::Block,
        }
    }

    /// Test `candidate` against every identifier this anchor exposes.
    ///
    /// Header anchors match on both `id` and `url_encoded_id`; block anchors
    /// compare on `id` alone.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Header {
                id, url_encoded_id, ..
            } => id == candidate || url_encoded_id == candidate,
            Self::Block { id, .. } => id == candidate,
        }
    }
}

/// One markdown heading, recorded independently of anchor usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// Heading level, 1 through 6
    pub level: u8,
    /// Display text with inline markup flattened
    pub text: String,
    /// The heading line as written in source
    pub raw: String,
}

/// Where a link points.
///
/// `path` is `None` when the reference could not be resolved to a candidate
/// file (malformed, URL scheme, escapes the scope root); `raw` always keeps
/// the reference text as written so diagnostics can report it precisely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    /// Resolved absolute path, when resolution succeeded
    pub path: Option<PathBuf>,
    /// The path portion of the reference exactly as written
    pub raw: String,
    /// The anchor fragment, without any `#` separator, when present
    pub anchor: Option<String>,
}

/// An inline directive adjacent to a link that overrides extraction
/// behavior for that specific link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionMarker {
    /// The directive text inside the comment, trimmed
    pub inner_text: String,
}

/// One outgoing link extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Surface syntax the link was written in
    pub link_type: LinkType,
    /// Internal or cross-document
    pub scope: Scope,
    /// Kind of anchor the link targets; `None` for whole-file links
    pub anchor_type: Option<AnchorKind>,
    /// Absolute path of the file containing the link
    pub source_path: PathBuf,
    /// Resolved target
    pub target: Target,
    /// The link's display text (alias text for wiki links)
    pub text: String,
    /// The complete link syntax as matched in source
    pub full_match: String,
    /// 1-based source line
    pub line: usize,
    /// 1-based source column
    pub column: usize,
    /// Extraction directive attached to this link, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_marker: Option<ExtractionMarker>,
}

impl Link {
    /// Whether the link targets a whole file rather than a specific anchor.
    #[must_use]
    pub fn is_whole_file(&self) -> bool {
        self.anchor_type.is_none()
    }

    /// The directive text of the attached marker, if any.
    #[must_use]
    pub fn marker_text(&self) -> Option<&str> {
        self.extraction_marker
            .as_ref()
            .map(|m| m.inner_text.as_str())
    }
}

/// The complete structural contract for one parsed file.
///
/// Immutable once produced. `links`, `headings`, and `anchors` are derived
/// purely from `content`, preserving source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParserOutput {
    /// Absolute path of the parsed file
    pub file_path: PathBuf,
    /// Raw file content
    pub content: String,
    /// Outgoing links in source order
    pub links: Vec<Link>,
    /// Headings in source order
    pub headings: Vec<Heading>,
    /// Anchors (header and block) in source order
    pub anchors: Vec<Anchor>,
}
