//! Link, block-anchor, and extraction-marker scanning.
//!
//! Four citation syntaxes are recognized:
//!
//! - Plain markdown links: `[text](path#anchor)`
//! - Wiki-style links: `[[path#anchor|text]]` (and `![[...]]` embeds)
//! - Caret block references: `[[path#^block-id]]`
//! - Citation-style references: `[^name]` resolving to a `^name` block anchor
//!
//! Matching runs against a code-masked copy of the content so links inside
//! fenced blocks and inline code are never extracted; the mask is
//! length-preserving, so match spans index directly into the original text.
//! External URLs are skipped outright rather than recorded, matching how
//! reference scanners filter `scheme://` targets.
//!
//! An extraction marker attaches to the link it follows: the comment must
//! trail the link on the same line (before the next link starts) or stand
//! alone on the line immediately below, in which case it attaches to the
//! line's last link. A comment written before a link never attaches.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::paths;
use super::types::{Anchor, AnchorKind, ExtractionMarker, Link, LinkType, Scope, Target};

static WIKI_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!?\[\[([^\[\]#|]*)(?:#([^\[\]|]*))?(?:\|([^\[\]]*))?\]\]")
        .expect("valid wiki link regex")
});

static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!?\[([^\]]*)\]\(([^()\s]+)\)").expect("valid markdown link regex")
});

static CITATION_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\^([A-Za-z0-9_-]+)\]").expect("valid citation regex"));

static BLOCK_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(\^([A-Za-z0-9][A-Za-z0-9_-]*))\s*$").expect("valid block anchor regex")
});

static MARKER_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--\s*([A-Za-z][A-Za-z0-9 _-]*?)\s*-->").expect("valid marker regex")
});

/// Blank out fenced code blocks and inline code spans.
///
/// The result has exactly the same length and line structure as the input;
/// masked characters become spaces. Fence delimiter lines themselves are
/// masked too.
pub(crate) fn mask_code(content: &str) -> String {
    let mut masked = String::with_capacity(content.len());
    let mut in_fence = false;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let is_fence_delimiter = trimmed.starts_with("```") || trimmed.starts_with("~~~");

        if is_fence_delimiter {
            in_fence = !in_fence;
            blank_line(&mut masked, line);
        } else if in_fence {
            blank_line(&mut masked, line);
        } else {
            masked.push_str(&mask_inline_code(line));
        }
    }
    masked
}

fn blank_line(out: &mut String, line: &str) {
    // One space per byte so offsets stay aligned even for multibyte text.
    for &b in line.as_bytes() {
        out.push(if b == b'\n' || b == b'\r' { b as char } else { ' ' });
    }
}

/// Replace `` `...` `` spans (including the backticks) with spaces.
fn mask_inline_code(line: &str) -> String {
    static INLINE_CODE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"`[^`\n]*`").expect("valid inline code regex"));

    let mut masked = line.to_string();
    while let Some(m) = INLINE_CODE.find(&masked) {
        let blank = " ".repeat(m.end() - m.start());
        masked.replace_range(m.range(), &blank);
    }
    masked
}

/// Scan for `^identifier` block anchors at line ends, outside code.
pub(crate) fn extract_block_anchors(content: &str) -> Vec<Anchor> {
    let masked = mask_code(content);
    let mut anchors = Vec::new();

    for (index, (masked_line, original_line)) in masked.lines().zip(content.lines()).enumerate() {
        if let Some(caps) = BLOCK_ANCHOR.captures(masked_line) {
            let full = caps.get(1).expect("block anchor group");
            let id = caps.get(2).expect("block id group");
            anchors.push(Anchor::Block {
                id: original_line[id.range()].to_string(),
                full_match: original_line[full.range()].to_string(),
                line: index + 1,
                column: full.start() + 1,
            });
        }
    }
    anchors
}

/// A link match before marker attachment, with its span within the line.
struct PendingLink {
    start: usize,
    end: usize,
    link: Link,
}

/// Extract every outgoing link from `content`.
///
/// `source_path` must already be absolute and normalized; resolved target
/// paths are derived from it. `scope`, when given, bounds resolution and
/// anchors scope-absolute (`/...`) references.
pub(crate) fn extract_links(source_path: &Path, scope: Option<&Path>, content: &str) -> Vec<Link> {
    let masked = mask_code(content);
    let original_lines: Vec<&str> = content.lines().collect();
    let mut links = Vec::new();

    let masked_lines: Vec<&str> = masked.lines().collect();
    for (index, masked_line) in masked_lines.iter().copied().enumerate() {
        let original_line = original_lines.get(index).copied().unwrap_or_default();
        let line_no = index + 1;

        let mut pending = scan_line(source_path, scope, masked_line, original_line, line_no);
        pending.sort_by_key(|p| p.start);

        let count = pending.len();
        for i in 0..count {
            let search_start = pending[i].end;
            let search_end = pending.get(i + 1).map_or(masked_line.len(), |next| next.start);
            let mut marker =
                find_marker(&masked_line[search_start..search_end], &original_line[search_start..search_end]);

            // The line immediately below can carry the directive for the
            // line's final link.
            if marker.is_none() && i + 1 == count {
                if let Some(next_line) = masked_lines.get(index + 1) {
                    let trimmed = next_line.trim();
                    if let Some(caps) = MARKER_COMMENT.captures(trimmed) {
                        if caps.get(0).map(|m| m.as_str()) == Some(trimmed) {
                            marker = Some(ExtractionMarker {
                                inner_text: caps[1].to_string(),
                            });
                        }
                    }
                }
            }

            pending[i].link.extraction_marker = marker;
        }

        links.extend(pending.into_iter().map(|p| p.link));
    }
    links
}

fn find_marker(masked_slice: &str, original_slice: &str) -> Option<ExtractionMarker> {
    let m = MARKER_COMMENT.captures(masked_slice)?;
    let inner = m.get(1)?;
    Some(ExtractionMarker {
        inner_text: original_slice[inner.range()].to_string(),
    })
}

/// Collect all link matches on one line, without marker attachment.
fn scan_line(
    source_path: &Path,
    scope: Option<&Path>,
    masked_line: &str,
    original_line: &str,
    line_no: usize,
) -> Vec<PendingLink> {
    let mut pending: Vec<PendingLink> = Vec::new();
    let mut occupied: Vec<(usize, usize)> = Vec::new();

    for caps in WIKI_LINK.captures_iter(masked_line) {
        let whole = caps.get(0).expect("wiki match");
        let target_raw = original_line[caps.get(1).expect("wiki target").range()].trim();
        let anchor = caps
            .get(2)
            .map(|m| original_line[m.range()].trim().to_string())
            .filter(|a| !a.is_empty());
        let alias = caps.get(3).map(|m| original_line[m.range()].trim().to_string());

        if target_raw.contains("://") {
            continue;
        }

        let link_type = match &anchor {
            Some(a) if a.starts_with('^') => LinkType::BlockReference,
            _ => LinkType::Wiki,
        };
        if let Some(link) = build_link(
            source_path,
            scope,
            link_type,
            target_raw,
            anchor,
            alias,
            &original_line[whole.range()],
            line_no,
            whole.start(),
            true,
        ) {
            occupied.push((whole.start(), whole.end()));
            pending.push(PendingLink {
                start: whole.start(),
                end: whole.end(),
                link,
            });
        }
    }

    for caps in MARKDOWN_LINK.captures_iter(masked_line) {
        let whole = caps.get(0).expect("markdown match");
        if overlaps(&occupied, whole.start(), whole.end()) {
            continue;
        }
        let text = original_line[caps.get(1).expect("link text").range()].to_string();
        let href = &original_line[caps.get(2).expect("link href").range()];
        if href.contains("://") {
            continue;
        }

        let (path_part, anchor_part) = match href.split_once('#') {
            Some((p, a)) => (p, Some(a.to_string()).filter(|a| !a.is_empty())),
            None => (href, None),
        };

        if let Some(link) = build_link(
            source_path,
            scope,
            LinkType::Markdown,
            path_part,
            anchor_part,
            Some(text),
            &original_line[whole.range()],
            line_no,
            whole.start(),
            false,
        ) {
            occupied.push((whole.start(), whole.end()));
            pending.push(PendingLink {
                start: whole.start(),
                end: whole.end(),
                link,
            });
        }
    }

    for caps in CITATION_REF.captures_iter(masked_line) {
        let whole = caps.get(0).expect("citation match");
        if overlaps(&occupied, whole.start(), whole.end()) {
            continue;
        }
        // `[^name]:` is the definition site, not a reference.
        if masked_line[whole.end()..].starts_with(':') {
            continue;
        }
        let id = original_line[caps.get(1).expect("citation id").range()].to_string();

        pending.push(PendingLink {
            start: whole.start(),
            end: whole.end(),
            link: Link {
                link_type: LinkType::Citation,
                scope: Scope::Internal,
                anchor_type: Some(AnchorKind::Block),
                source_path: source_path.to_path_buf(),
                target: Target {
                    path: Some(source_path.to_path_buf()),
                    raw: String::new(),
                    anchor: Some(format!("^{id}")),
                },
                text: id,
                full_match: original_line[whole.range()].to_string(),
                line: line_no,
                column: whole.start() + 1,
                extraction_marker: None,
            },
        });
    }

    pending
}

fn overlaps(occupied: &[(usize, usize)], start: usize, end: usize) -> bool {
    occupied.iter().any(|&(s, e)| start < e && end > s)
}

#[allow(clippy::too_many_arguments)]
fn build_link(
    source_path: &Path,
    scope: Option<&Path>,
    link_type: LinkType,
    target_raw: &str,
    anchor: Option<String>,
    alias: Option<String>,
    full_match: &str,
    line_no: usize,
    start: usize,
    assume_md: bool,
) -> Option<Link> {
    let anchor_type = anchor.as_deref().map(|a| {
        if a.starts_with('^') {
            AnchorKind::Block
        } else {
            AnchorKind::Header
        }
    });

    let (resolved, scope_kind) = if target_raw.is_empty() {
        // Pure fragment reference stays within the source file.
        anchor.as_ref()?;
        (Some(source_path.to_path_buf()), Scope::Internal)
    } else {
        let resolved = paths::resolve_target(source_path, scope, target_raw, assume_md);
        let scope_kind = match &resolved {
            Some(p) if p == source_path => Scope::Internal,
            _ => Scope::CrossDocument,
        };
        (resolved, scope_kind)
    };

    let text = alias
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| target_raw.to_string());

    Some(Link {
        link_type,
        scope: scope_kind,
        anchor_type,
        source_path: source_path.to_path_buf(),
        target: Target {
            path: resolved,
            raw: target_raw.to_string(),
            anchor,
        },
        text,
        full_match: full_match.to_string(),
        line: line_no,
        column: start + 1,
        extraction_marker: None,
    })
}
