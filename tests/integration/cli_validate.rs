//! End-to-end tests for `mdcite validate`.

use predicates::prelude::*;

use crate::common::TestKb;

#[tokio::test]
async fn valid_anchor_exits_zero() {
    let kb = TestKb::new();
    kb.write("source.md", "See [intro](target.md#Introduction).\n")
        .await;
    kb.write("target.md", "# Introduction\n").await;

    kb.mdcite()
        .args(["validate", "source.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 valid, 0 error(s)"));
}

#[tokio::test]
async fn typo_exits_nonzero_with_suggestion() {
    let kb = TestKb::new();
    kb.write("source.md", "See [intro](target.md#Intruduction).\n")
        .await;
    kb.write("target.md", "# Introduction\n\n# Usage\n").await;

    kb.mdcite()
        .args(["validate", "source.md"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("did you mean 'Introduction'?"))
        .stderr(predicate::str::contains("broken citation"));
}

#[tokio::test]
async fn missing_source_file_reports_context() {
    let kb = TestKb::new();

    kb.mdcite()
        .args(["validate", "absent.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}

#[tokio::test]
async fn json_report_has_summary_and_results() {
    let kb = TestKb::new();
    kb.write(
        "source.md",
        "Good [a](target.md#Setup), bad [b](target.md#Nope).\n",
    )
    .await;
    kb.write("target.md", "# Setup\n").await;

    let output = kb
        .mdcite()
        .args(["validate", "source.md", "--format", "json"])
        .output()
        .expect("run mdcite");

    let reports: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid json report");
    let report = &reports[0];
    assert_eq!(report["summary"]["valid"], 1);
    assert_eq!(report["summary"]["errors"], 1);
    assert_eq!(report["results"][0]["status"], "valid");
    assert_eq!(report["results"][1]["status"], "error");
    assert!(!output.status.success());
}

#[tokio::test]
async fn warnings_do_not_fail_the_run() {
    let kb = TestKb::new();
    kb.write("source.md", "Cited[^pending] work.\n").await;

    kb.mdcite()
        .args(["validate", "source.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 warning(s)"));
}

#[tokio::test]
async fn multiple_files_are_validated_together() {
    let kb = TestKb::new();
    kb.write("a.md", "[[target#Setup]]\n").await;
    kb.write("b.md", "[[target]]\n").await;
    kb.write("target.md", "# Setup\n").await;

    kb.mdcite()
        .args(["validate", "a.md", "b.md"])
        .assert()
        .success();
}

#[tokio::test]
async fn scope_blocks_references_escaping_the_root() {
    let kb = TestKb::new();
    kb.write("notes/source.md", "[out](../../outside.md)\n").await;

    kb.mdcite()
        .args(["validate", "notes/source.md", "--scope", "."])
        .assert()
        .failure()
        .stdout(predicate::str::contains("cannot resolve reference"));
}
