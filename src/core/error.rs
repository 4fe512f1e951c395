//! Error handling for mdcite.
//!
//! This module defines [`CiteError`], the typed error enum shared by the
//! parser, document cache, and validator. The design follows two rules:
//!
//! 1. **Errors are cheap to share.** Every variant carries owned string
//!    payloads and derives [`Clone`], because a single failed parse is fanned
//!    out to every caller waiting on the same cache entry.
//! 2. **Per-link problems are data, not errors.** A missing anchor or an
//!    unresolvable link target inside a document is recorded in the
//!    validation report; `CiteError` is reserved for failures that abort an
//!    operation (the source file cannot be opened, a reserved method was
//!    called).
//!
//! The CLI layer wraps these in [`anyhow::Error`] with extra context before
//! displaying them; library code propagates them unchanged with `?`.

use std::path::Path;

use thiserror::Error;

/// Typed errors for parse, cache, and validation operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CiteError {
    /// The requested path does not resolve to a readable file.
    ///
    /// Raised by the parser when the file is absent, and surfaced by the
    /// validator as a fail-fast error when the *source* file is missing.
    /// Target-side occurrences are converted into per-link error results.
    #[error("file not found: {path}")]
    FileNotFound {
        /// The path that could not be found
        path: String,
    },

    /// The file exists but could not be read (permissions, encoding,
    /// transient I/O failure).
    #[error("failed to read {path}: {reason}")]
    ReadError {
        /// The path that failed to read
        path: String,
        /// Description of the underlying I/O failure
        reason: String,
    },

    /// A link's target could not be resolved to any candidate path.
    ///
    /// Recorded per-link by the validator; only escalated to a real error
    /// when a caller asks the cache to resolve an unresolvable reference
    /// directly.
    #[error("cannot resolve reference '{reference}' from {source_file}")]
    PathResolutionFailure {
        /// The raw reference text as written in the document
        reference: String,
        /// The file containing the reference
        source_file: String,
    },

    /// A reserved facade method was called.
    ///
    /// Signals a deliberate capability gap (targeted section/block
    /// extraction), not a defect.
    #[error("{operation} is not implemented")]
    NotImplemented {
        /// The operation that is not available
        operation: String,
    },
}

impl CiteError {
    /// Convert an I/O error from reading `path` into the matching variant.
    ///
    /// `NotFound` maps to [`CiteError::FileNotFound`]; everything else
    /// becomes a [`CiteError::ReadError`] carrying the OS error text.
    pub fn from_io(path: &Path, err: &std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Self::ReadError {
                path: path.display().to_string(),
                reason: err.to_string(),
            }
        }
    }

    /// Whether this error means the underlying file does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }
}
