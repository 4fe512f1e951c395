//! Single-flight document cache.
//!
//! [`DocumentCache`] maps a normalized absolute path to a shared parse
//! handle. The invariant it owns: **for any path, the parser runs at most
//! once concurrently, and every caller of that attempt observes the same
//! facade or the same failure.** The handle is inserted before the parse
//! settles, so a second caller arriving mid-flight attaches to the existing
//! future instead of spawning a duplicate parse.
//!
//! Failed flights are evicted (identity-checked, so a retry that is already
//! in progress is never clobbered), which keeps a transient read failure
//! from poisoning the path forever.
//!
//! The map is a [`DashMap`] for lock-free concurrent access; only this
//! module mutates it, and eviction-on-failure is the only mutation besides
//! insertion.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::debug;

use crate::core::Result;
use crate::document::ParsedDocument;
use crate::parser::{self, ParseOptions, paths};

#[cfg(any(test, feature = "test-utils"))]
use std::sync::atomic::{AtomicUsize, Ordering};

/// A parse operation shared by every caller of one path.
type Flight = Shared<BoxFuture<'static, Result<Arc<ParsedDocument>>>>;

/// Deduplicating asynchronous cache of parsed documents.
///
/// Cheap to clone; clones share the same entry map.
#[derive(Clone)]
pub struct DocumentCache {
    entries: Arc<DashMap<PathBuf, Flight>>,
    options: ParseOptions,

    /// Number of parses actually started, for dedup verification in tests.
    #[cfg(any(test, feature = "test-utils"))]
    parses: Arc<AtomicUsize>,
}

impl DocumentCache {
    /// Create an empty cache with default parse options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    /// Create an empty cache with explicit parse options.
    #[must_use]
    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            options,
            #[cfg(any(test, feature = "test-utils"))]
            parses: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Resolve `path` to its parsed-document facade, parsing at most once.
    ///
    /// Concurrent callers for the same normalized path share one parse and
    /// receive the same [`Arc<ParsedDocument>`] (or the same error). After a
    /// failure the entry is removed, so a later call retries from scratch.
    ///
    /// # Errors
    ///
    /// Propagates the parser's [`CiteError`](crate::core::CiteError) for the
    /// attempt this caller joined.
    pub async fn resolve(&self, path: &Path) -> Result<Arc<ParsedDocument>> {
        let key = paths::absolutize(path)?;

        let flight = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| {
                debug!(file = %key.display(), "starting parse flight");
                self.spawn_flight(key.clone())
            })
            .value()
            .clone();

        let result = flight.clone().await;

        if result.is_err() {
            // Evict only if the map still holds the flight that failed;
            // a concurrent retry may have inserted a fresh one already.
            self.entries.remove_if(&key, |_, current| current.ptr_eq(&flight));
        }

        result
    }

    /// Number of entries currently held (in flight or settled).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached entry.
    pub fn invalidate_all(&self) {
        self.entries.clear();
    }

    /// How many parse operations have actually started.
    #[cfg(any(test, feature = "test-utils"))]
    #[must_use]
    pub fn parse_count(&self) -> usize {
        self.parses.load(Ordering::SeqCst)
    }

    fn spawn_flight(&self, path: PathBuf) -> Flight {
        let options = self.options.clone();
        #[cfg(any(test, feature = "test-utils"))]
        let parses = Arc::clone(&self.parses);

        async move {
            #[cfg(any(test, feature = "test-utils"))]
            parses.fetch_add(1, Ordering::SeqCst);

            let output = parser::parse_file(&path, &options).await?;
            Ok(Arc::new(ParsedDocument::new(output)))
        }
        .boxed()
        .shared()
    }
}

impl Default for DocumentCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DocumentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::fs;

    #[tokio::test]
    async fn repeated_resolves_share_one_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");
        fs::write(&path, "# Note\n").await.unwrap();

        let cache = DocumentCache::new();
        let first = cache.resolve(&path).await.unwrap();
        let second = cache.resolve(&path).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.parse_count(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_resolves_share_one_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");
        fs::write(&path, "# Note\n\nBody. ^b1\n").await.unwrap();

        let cache = DocumentCache::new();
        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let cache = cache.clone();
                let path = path.clone();
                tokio::spawn(async move { cache.resolve(&path).await })
            })
            .collect();

        let mut facades = Vec::new();
        for task in tasks {
            facades.push(task.await.unwrap().unwrap());
        }

        assert_eq!(cache.parse_count(), 1);
        for facade in &facades[1..] {
            assert!(Arc::ptr_eq(&facades[0], facade));
        }
    }

    #[tokio::test]
    async fn dot_segments_normalize_to_one_entry() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).await.unwrap();
        let direct = dir.path().join("note.md");
        fs::write(&direct, "# Note\n").await.unwrap();
        let indirect = dir.path().join("sub").join("..").join("note.md");

        let cache = DocumentCache::new();
        cache.resolve(&direct).await.unwrap();
        cache.resolve(&indirect).await.unwrap();

        assert_eq!(cache.parse_count(), 1);
    }

    #[tokio::test]
    async fn failure_is_shared_then_evicted_for_retry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.md");

        let cache = DocumentCache::new();
        let err = cache.resolve(&path).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(cache.is_empty());

        // The file appears afterwards; a fresh attempt succeeds.
        fs::write(&path, "# Late\n").await.unwrap();
        let facade = cache.resolve(&path).await.unwrap();
        assert_eq!(facade.headings().len(), 1);
        assert_eq!(cache.parse_count(), 2);
    }

    #[tokio::test]
    async fn invalidate_all_forces_reparse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");
        fs::write(&path, "# Note\n").await.unwrap();

        let cache = DocumentCache::new();
        cache.resolve(&path).await.unwrap();
        cache.invalidate_all();
        cache.resolve(&path).await.unwrap();
        assert_eq!(cache.parse_count(), 2);
    }
}
