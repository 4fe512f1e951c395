//! Integration test suite for mdcite.
//!
//! Binary-level tests drive the `mdcite` executable against temporary
//! knowledge bases; library-level tests exercise the concurrency properties
//! that need direct access to the cache.
//!
//! # Running
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cache_dedup**: single-flight parse deduplication under concurrency
//! - **cli_validate**: the `validate` command end to end
//! - **cli_eligibility**: the `eligibility` command end to end

mod common;

mod cache_dedup;
mod cli_eligibility;
mod cli_validate;
