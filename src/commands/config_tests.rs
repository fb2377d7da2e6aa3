use std::fs;

use tempfile::TempDir;

use super::*;
use crate::RepoGuardError;
use crate::config::RealFileSystem;

const RULES: &str = r#"
[target]
repo = "octo/demo"
ref = "main"

[[existence]]
path = "README.md"

[[existence]]
path = "LICENSE"

[[commit]]
author = "bot"
"#;

#[test]
fn counts_are_listed_per_category_in_order() {
    let spec = RuleLoader::<RealFileSystem>::parse(RULES).unwrap();
    assert_eq!(
        format_rule_counts(&spec),
        "Target: octo/demo\nRef: main\n  env: 0\n  existence: 2\n  structure: 0\n  content: 0\n  commit: 1\nTotal: 3 rules\n"
    );
}

#[test]
fn owner_may_be_left_to_the_environment() {
    let spec = RuleLoader::<RealFileSystem>::parse("[target]\nrepo = \"demo\"\n").unwrap();
    assert!(format_rule_counts(&spec).starts_with("Target: demo\n  env: 0\n"));
}

#[test]
fn validate_reads_file_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.toml");
    fs::write(&path, RULES).unwrap();

    let spec = run_config_validate_impl(&path).unwrap();
    assert_eq!(spec.rule_count(), 3);
    assert_eq!(run_config_validate(&path, ColorMode::Never), EXIT_SUCCESS);
}

#[test]
fn validate_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    assert!(matches!(
        run_config_validate_impl(&path),
        Err(RepoGuardError::Config(_))
    ));
    assert_eq!(run_config_validate(&path, ColorMode::Never), EXIT_CONFIG_ERROR);
}

#[test]
fn validate_rejects_invalid_regex() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.toml");
    fs::write(
        &path,
        "[target]\nrepo = \"octo/demo\"\n\n[[commit]]\nmessage = \"(unclosed\"\n",
    )
    .unwrap();

    assert!(matches!(
        run_config_validate_impl(&path),
        Err(RepoGuardError::InvalidPattern { .. })
    ));
}
