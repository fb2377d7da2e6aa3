#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// Creates an `assert_cmd` Command for the repo-guard binary with credential
/// variables cleared, so tests never depend on the caller's environment.
#[macro_export]
macro_rules! repo_guard {
    () => {{
        let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("repo-guard"));
        cmd.env_remove("MCP_GITHUB_TOKEN")
            .env_remove("GITHUB_EVAL_ORG")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }};
}

/// Creates a temporary directory with test fixtures for integration tests.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Creates a file with the given content in the temp directory.
    pub fn create_file(&self, relative_path: &str, content: &str) {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Creates `repo-guard.toml` in the temp directory.
    pub fn create_rules(&self, content: &str) {
        self.create_file("repo-guard.toml", content);
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Rules pointing at an API endpoint nothing listens on.
pub const UNREACHABLE_RULES: &str = r#"
[target]
repo = "octo/demo"
api_url = "http://127.0.0.1:1"

[[existence]]
path = "README.md"
"#;

/// Valid rules covering every category.
pub const ALL_CATEGORIES_RULES: &str = r#"
[target]
repo = "octo/demo"

[[env]]
var = "CI"

[[existence]]
path = "README.md"

[[structure]]
closed_world = true
entries = [{ path = "README.md", kind = "file" }]
allow = [".github/**"]

[[content]]
path = "README.md"
kind = "contains"
expected = "License"

[[commit]]
author = "bot"
within_days = 30
"#;
