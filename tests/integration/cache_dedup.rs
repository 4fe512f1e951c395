//! Single-flight cache properties that need direct library access.

use std::path::PathBuf;
use std::sync::Arc;

use mdcite::cache::DocumentCache;
use mdcite::validator::Validator;

use crate::common::TestKb;

/// N simultaneous resolves of one path run exactly one parse, and every
/// caller gets the same facade instance.
#[tokio::test]
async fn simultaneous_resolves_parse_once() {
    let kb = TestKb::new();
    let target = kb.write("target.md", "# Shared\n\nBody. ^b1\n").await;

    let cache = DocumentCache::new();
    let tasks: Vec<_> = (0..32)
        .map(|_| {
            let cache = cache.clone();
            let target = target.clone();
            tokio::spawn(async move { cache.resolve(&target).await })
        })
        .collect();

    let mut facades = Vec::new();
    for task in tasks {
        facades.push(task.await.expect("join").expect("resolve"));
    }

    assert_eq!(cache.parse_count(), 1);
    for facade in &facades[1..] {
        assert!(Arc::ptr_eq(&facades[0], facade));
    }
}

/// Two validators concurrently validating two source files that both link
/// into the same target: the target is parsed exactly once.
#[tokio::test]
async fn concurrent_validators_share_target_parse() {
    let kb = TestKb::new();
    let source_a = kb
        .write("a.md", "See [intro](target.md#Introduction).\n")
        .await;
    let source_b = kb
        .write("b.md", "Also see [[target#Introduction]].\n")
        .await;
    kb.write("target.md", "# Introduction\n").await;

    let cache = DocumentCache::new();
    let validator_a = Validator::new(cache.clone());
    let validator_b = Validator::new(cache.clone());

    let (report_a, report_b) = tokio::join!(
        validator_a.validate_file(&source_a),
        validator_b.validate_file(&source_b),
    );

    assert!(!report_a.expect("a validates").has_errors());
    assert!(!report_b.expect("b validates").has_errors());
    // Two sources plus one shared target.
    assert_eq!(cache.parse_count(), 3);
}

/// All concurrent waiters of a failed flight see the same error, and the
/// path stays retryable afterwards.
#[tokio::test]
async fn failure_fans_out_then_allows_retry() {
    let kb = TestKb::new();
    let missing: PathBuf = kb.path("missing.md");

    let cache = DocumentCache::new();
    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let cache = cache.clone();
            let missing = missing.clone();
            tokio::spawn(async move { cache.resolve(&missing).await })
        })
        .collect();

    for task in tasks {
        let err = task.await.expect("join").expect_err("must fail");
        assert!(err.is_not_found());
    }

    kb.write("missing.md", "# Now Exists\n").await;
    let facade = cache.resolve(&missing).await.expect("retry succeeds");
    assert_eq!(facade.headings().len(), 1);
}
