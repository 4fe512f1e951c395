//! Core types shared across mdcite.
//!
//! Currently this is the error taxonomy; see [`error`] for the design
//! rationale (clone-able variants, errors-as-data for per-link outcomes).

pub mod error;

pub use error::CiteError;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, CiteError>;
