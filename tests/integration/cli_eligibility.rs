//! End-to-end tests for `mdcite eligibility`.

use predicates::prelude::*;

use crate::common::TestKb;

#[tokio::test]
async fn whole_file_link_defaults_to_skip() {
    let kb = TestKb::new();
    kb.write("source.md", "Read [[target]] later.\n").await;
    kb.write("target.md", "body\n").await;

    kb.mdcite()
        .args(["eligibility", "source.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skip"))
        .stdout(predicate::str::contains("full-files flag"));
}

#[tokio::test]
async fn full_files_flag_enables_whole_file_extraction() {
    let kb = TestKb::new();
    kb.write("source.md", "Read [[target]] later.\n").await;
    kb.write("target.md", "body\n").await;

    kb.mdcite()
        .args(["eligibility", "source.md", "--full-files"])
        .assert()
        .success()
        .stdout(predicate::str::contains("extract"));
}

#[tokio::test]
async fn force_marker_overrides_missing_flag() {
    let kb = TestKb::new();
    kb.write("source.md", "Read [[target]] <!-- force-extract -->\n")
        .await;
    kb.write("target.md", "body\n").await;

    kb.mdcite()
        .args(["eligibility", "source.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("force-extract"));
}

#[tokio::test]
async fn stop_marker_wins_over_enabled_flag() {
    let kb = TestKb::new();
    kb.write(
        "source.md",
        "Read [[target#Section]] <!-- stop-extract-link -->\n",
    )
    .await;
    kb.write("target.md", "# Section\n").await;

    kb.mdcite()
        .args(["eligibility", "source.md", "--full-files"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skip"))
        .stdout(predicate::str::contains("stop-extract-link"));
}

#[tokio::test]
async fn json_output_carries_eligibility_and_reason() {
    let kb = TestKb::new();
    kb.write(
        "source.md",
        "Anchor [[target#Section]] and file [[target]].\n",
    )
    .await;
    kb.write("target.md", "# Section\n").await;

    let output = kb
        .mdcite()
        .args(["eligibility", "source.md", "--format", "json"])
        .output()
        .expect("run mdcite");
    assert!(output.status.success());

    let entries: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(entries[0]["eligible"], true);
    assert_eq!(entries[1]["eligible"], false);
    assert!(entries[1]["reason"].as_str().unwrap().contains("full-files"));
}
