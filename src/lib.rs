//! Citation validation and extraction for markdown knowledge bases.
//!
//! Authors of a documentation tree link between files with plain markdown
//! links, wiki-style links, caret block references, and citation-style
//! references, pointing at headings, block anchors, or whole files. mdcite
//! checks that every referenced anchor actually exists, suggests corrections
//! for near misses, and decides per link whether its content is eligible for
//! extraction into aggregated output.
//!
//! # Architecture
//!
//! Data flows leaves-first through five components:
//!
//! - [`parser`]: tokenizes one file into headings, anchors (header and
//!   block variants), and links; pure function of file bytes
//! - [`document`]: query facade over one parse result: dual-ID anchor
//!   lookup and fuzzy correction suggestions
//! - [`cache`]: single-flight async cache mapping normalized paths to
//!   facades; a file is parsed at most once even under concurrent callers
//! - [`validator`]: classifies every outgoing link of a source file as
//!   valid, error, or warning, with suggestions for broken anchors
//! - [`extraction`]: ordered rule chain deciding per-link extraction
//!   eligibility from inline markers and caller flags
//!
//! The [`cli`] module is a thin consumer that renders reports and derives
//! exit codes; auto-fixing broken links and the actual content aggregation
//! are external consumers of the report structures.
//!
//! # Example
//!
//! ```rust,no_run
//! use mdcite::cache::DocumentCache;
//! use mdcite::validator::Validator;
//! use std::path::Path;
//!
//! # async fn example() -> mdcite::core::Result<()> {
//! let validator = Validator::new(DocumentCache::new());
//! let report = validator.validate_file(Path::new("notes/index.md")).await?;
//! if report.has_errors() {
//!     for result in &report.results {
//!         if let Some(suggestion) = &result.suggestion {
//!             eprintln!("{}: {suggestion}", result.link.line);
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cli;
pub mod core;
pub mod document;
pub mod extraction;
pub mod parser;
pub mod validator;
