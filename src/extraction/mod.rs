//! Extraction-eligibility decisions.
//!
//! A chain of responsibility over a fixed, ordered list of rules decides,
//! per link, whether its target content may be pulled into aggregated
//! output. Precedence, first decisive rule wins:
//!
//! 1. stop marker: an explicit `stop-extract-link` directive; nothing
//!    overrides it
//! 2. force marker: `force-extract` overrides the whole-file restriction
//! 3. anchor-scoped links are extractable by default
//! 4. whole-file links fall through to the `full_files` flag (terminal;
//!    this rule always decides, so the chain is total)
//!
//! The actual content copy is the consumer's concern; this module only
//! produces [`Decision`]s with the reason that decided them.

use serde::Serialize;

use crate::parser::Link;

/// Directive text that forbids extraction for a link.
pub const STOP_DIRECTIVE: &str = "stop-extract-link";

/// Directive text that forces extraction for a link.
pub const FORCE_DIRECTIVE: &str = "force-extract";

/// Caller-supplied extraction switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractionFlags {
    /// Allow extraction of whole files (links without an anchor fragment)
    pub full_files: bool,
}

/// The chain's verdict for one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// Whether the link's target content may be extracted
    pub eligible: bool,
    /// Which rule decided, in human-readable form
    pub reason: String,
}

impl Decision {
    fn eligible(reason: impl Into<String>) -> Self {
        Self {
            eligible: true,
            reason: reason.into(),
        }
    }

    fn ineligible(reason: impl Into<String>) -> Self {
        Self {
            eligible: false,
            reason: reason.into(),
        }
    }
}

/// One rule in the chain.
///
/// Returns `Some` to decide, `None` to defer to the next rule. The terminal
/// rule in the standard chain never defers.
pub trait EligibilityRule: Send + Sync {
    /// Rule name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Evaluate this rule against one link.
    fn evaluate(&self, link: &Link, flags: &ExtractionFlags) -> Option<Decision>;
}

/// Rule 1: an explicit stop directive always wins.
pub struct StopMarkerRule;

impl EligibilityRule for StopMarkerRule {
    fn name(&self) -> &'static str {
        "stop-marker"
    }

    fn evaluate(&self, link: &Link, _flags: &ExtractionFlags) -> Option<Decision> {
        (link.marker_text() == Some(STOP_DIRECTIVE))
            .then(|| Decision::ineligible(format!("link carries a '{STOP_DIRECTIVE}' marker")))
    }
}

/// Rule 2: a force directive overrides the whole-file restriction.
pub struct ForceMarkerRule;

impl EligibilityRule for ForceMarkerRule {
    fn name(&self) -> &'static str {
        "force-marker"
    }

    fn evaluate(&self, link: &Link, _flags: &ExtractionFlags) -> Option<Decision> {
        (link.marker_text() == Some(FORCE_DIRECTIVE))
            .then(|| Decision::eligible(format!("link carries a '{FORCE_DIRECTIVE}' marker")))
    }
}

/// Rule 3: links targeting a heading or block are extractable by default.
pub struct AnchorLinkRule;

impl EligibilityRule for AnchorLinkRule {
    fn name(&self) -> &'static str {
        "anchor-link"
    }

    fn evaluate(&self, link: &Link, _flags: &ExtractionFlags) -> Option<Decision> {
        (!link.is_whole_file())
            .then(|| Decision::eligible("link targets a specific anchor"))
    }
}

/// Rule 4 (terminal): whole-file links follow the `full_files` flag.
///
/// Always returns a decision, which is what makes the chain total.
pub struct FullFileFlagRule;

impl EligibilityRule for FullFileFlagRule {
    fn name(&self) -> &'static str {
        "full-file-flag"
    }

    fn evaluate(&self, _link: &Link, flags: &ExtractionFlags) -> Option<Decision> {
        Some(if flags.full_files {
            Decision::eligible("whole-file extraction is enabled")
        } else {
            Decision::ineligible("whole-file link and the full-files flag is not set")
        })
    }
}

/// The ordered rule chain.
pub struct EligibilityChain {
    rules: Vec<Box<dyn EligibilityRule>>,
}

impl EligibilityChain {
    /// The standard chain in precedence order.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            rules: vec![
                Box::new(StopMarkerRule),
                Box::new(ForceMarkerRule),
                Box::new(AnchorLinkRule),
                Box::new(FullFileFlagRule),
            ],
        }
    }

    /// Evaluate the chain for one link; the first decisive rule wins.
    #[must_use]
    pub fn evaluate(&self, link: &Link, flags: &ExtractionFlags) -> Decision {
        for rule in &self.rules {
            if let Some(decision) = rule.evaluate(link, flags) {
                tracing::debug!(rule = rule.name(), eligible = decision.eligible, "chain decided");
                return decision;
            }
        }
        // Unreachable with the standard chain; a custom chain without a
        // terminal rule degrades to ineligible.
        Decision::ineligible("no rule produced a decision")
    }
}

impl Default for EligibilityChain {
    fn default() -> Self {
        Self::standard()
    }
}
