//! Integration tests for the `init` command.

mod common;

use common::TestFixture;
use predicates::prelude::*;

#[test]
fn init_creates_rule_file() {
    let fixture = TestFixture::new();

    repo_guard!()
        .current_dir(fixture.path())
        .args(["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created rule file"));

    let content = std::fs::read_to_string(fixture.path().join("repo-guard.toml")).unwrap();
    assert!(content.contains("[target]"));
    assert!(content.contains("[[existence]]"));
}

#[test]
fn init_fails_if_rule_file_exists() {
    let fixture = TestFixture::new();
    fixture.create_rules("# existing\n");

    repo_guard!()
        .current_dir(fixture.path())
        .args(["init"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_force_overwrites() {
    let fixture = TestFixture::new();
    fixture.create_rules("# existing\n");

    repo_guard!()
        .current_dir(fixture.path())
        .args(["init", "--force"])
        .assert()
        .success();

    let content = std::fs::read_to_string(fixture.path().join("repo-guard.toml")).unwrap();
    assert!(content.contains("[target]"));
}

#[test]
fn generated_template_validates() {
    let fixture = TestFixture::new();

    repo_guard!()
        .current_dir(fixture.path())
        .args(["init"])
        .assert()
        .success();

    repo_guard!()
        .current_dir(fixture.path())
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rule file is valid"));
}
