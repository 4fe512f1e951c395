//! Shared helpers for integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// A temporary knowledge base of markdown files.
pub struct TestKb {
    dir: TempDir,
}

impl TestKb {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Write a file into the knowledge base, creating parent directories.
    pub async fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.expect("create parents");
        }
        tokio::fs::write(&path, content).await.expect("write file");
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Command for the mdcite binary, rooted in this knowledge base.
    pub fn mdcite(&self) -> Command {
        let mut cmd = Command::cargo_bin("mdcite").expect("mdcite binary");
        cmd.current_dir(self.dir.path());
        cmd
    }
}
