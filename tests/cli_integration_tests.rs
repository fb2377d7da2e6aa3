//! Integration tests for global CLI behavior.

mod common;

use predicates::prelude::*;

#[test]
fn help_lists_subcommands() {
    repo_guard!()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn version_is_printed() {
    repo_guard!()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_subcommand_is_usage_error() {
    repo_guard!().assert().failure().code(2);
}

#[test]
fn unknown_format_is_rejected() {
    repo_guard!()
        .args(["check", "--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown output format"));
}
