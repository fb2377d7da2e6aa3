use super::*;
use crate::config::model::{
    CommitRuleConfig, ContentKind, ContentRuleConfig, ExistenceRuleConfig, ExpectedKind,
    StructureEntryConfig, StructureRuleConfig, TargetConfig,
};

fn target(repo: &str) -> TargetConfig {
    TargetConfig {
        repo: repo.to_string(),
        ..TargetConfig::default()
    }
}

fn file_with_target(repo: &str) -> RuleFile {
    RuleFile {
        target: target(repo),
        ..RuleFile::default()
    }
}

fn existence(path: &str) -> ExistenceRuleConfig {
    ExistenceRuleConfig {
        id: None,
        path: path.to_string(),
        exists: true,
        git_ref: None,
    }
}

fn content(kind: ContentKind, expected: Option<&str>, target: Option<&str>) -> ContentRuleConfig {
    ContentRuleConfig {
        id: None,
        path: "README.md".to_string(),
        kind,
        expected: expected.map(str::to_string),
        target: target.map(str::to_string),
        git_ref: None,
    }
}

fn commit() -> CommitRuleConfig {
    CommitRuleConfig {
        id: None,
        min_count: 1,
        author: None,
        message: None,
        within_days: None,
        files: Vec::new(),
        ignore_case: true,
    }
}

fn structure(entries: &[&str], closed_world: bool) -> StructureRuleConfig {
    StructureRuleConfig {
        id: None,
        root: None,
        closed_world,
        entries: entries
            .iter()
            .map(|p| StructureEntryConfig {
                path: (*p).to_string(),
                kind: ExpectedKind::Any,
            })
            .collect(),
        allow: Vec::new(),
        git_ref: None,
    }
}

// ============================================================================
// Target
// ============================================================================

#[test]
fn repo_with_owner_is_split() {
    let spec = validate_rules(file_with_target("acme/widgets")).unwrap();

    assert_eq!(spec.target.owner.as_deref(), Some("acme"));
    assert_eq!(spec.target.repo, "widgets");
}

#[test]
fn conflicting_owner_is_rejected() {
    let mut file = file_with_target("acme/widgets");
    file.target.owner = Some("other".to_string());

    assert!(validate_rules(file).is_err());
}

#[test]
fn empty_repo_is_rejected() {
    assert!(validate_rules(file_with_target("")).is_err());
    assert!(validate_rules(file_with_target("a/b/c")).is_err());
    assert!(validate_rules(file_with_target("/widgets")).is_err());
}

#[test]
fn commit_limit_must_be_in_range() {
    let mut file = file_with_target("r");
    file.target.commit_limit = 0;
    assert!(validate_rules(file.clone()).is_err());

    file.target.commit_limit = MAX_COMMIT_LIMIT + 1;
    assert!(validate_rules(file.clone()).is_err());

    file.target.commit_limit = MAX_COMMIT_LIMIT;
    assert!(validate_rules(file).is_ok());
}

#[test]
fn api_url_must_be_http() {
    let mut file = file_with_target("r");
    file.target.api_url = "ftp://example.com".to_string();

    assert!(validate_rules(file).is_err());
}

#[test]
fn api_url_trailing_slash_is_trimmed() {
    let mut file = file_with_target("r");
    file.target.api_url = "https://ghe.example.com/api/v3/".to_string();

    let spec = validate_rules(file).unwrap();

    assert_eq!(spec.target.api_url, "https://ghe.example.com/api/v3");
}

#[test]
fn is_remote_url_detects_schemes() {
    assert!(is_remote_url("https://api.github.com"));
    assert!(is_remote_url("http://localhost:8080"));
    assert!(!is_remote_url("api.github.com"));
}

// ============================================================================
// Paths and ids
// ============================================================================

#[test]
fn paths_are_normalized() {
    let mut file = file_with_target("r");
    file.existence = vec![existence("./docs/guide.md"), existence("docs/")];

    let spec = validate_rules(file).unwrap();

    assert_eq!(spec.existence[0].path, "docs/guide.md");
    assert_eq!(spec.existence[1].path, "docs");
}

#[test]
fn invalid_paths_are_rejected() {
    for bad in ["", "   ", "/etc/passwd", "../outside", "a/../b", "a//b", "a\\b", "./"] {
        let mut file = file_with_target("r");
        file.existence = vec![existence(bad)];
        assert!(validate_rules(file).is_err(), "path {bad:?} should be rejected");
    }
}

#[test]
fn default_ids_are_derived() {
    let mut file = file_with_target("r");
    file.existence = vec![existence("README.md")];
    file.content = vec![content(ContentKind::Contains, Some("License"), None)];
    file.commit = vec![commit()];
    file.structure = vec![structure(&["a.txt"], false)];

    let spec = validate_rules(file).unwrap();

    assert_eq!(spec.existence[0].id, "existence:README.md");
    assert_eq!(spec.content[0].id, "content-1:README.md");
    assert_eq!(spec.commit[0].id, "commit-1");
    assert_eq!(spec.structure[0].id, "structure-1");
}

#[test]
fn duplicate_ids_are_rejected() {
    let mut file = file_with_target("r");
    file.existence = vec![existence("README.md"), existence("README.md")];

    let err = validate_rules(file).unwrap_err();

    assert!(matches!(err, RepoGuardError::DuplicateRuleId(ref id) if id == "existence:README.md"));
}

#[test]
fn duplicate_ids_are_rejected_across_categories() {
    let mut file = file_with_target("r");
    let mut e = existence("README.md");
    e.id = Some("readme".to_string());
    let mut c = content(ContentKind::Contains, Some("x"), None);
    c.id = Some("readme".to_string());
    file.existence = vec![e];
    file.content = vec![c];

    assert!(matches!(
        validate_rules(file),
        Err(RepoGuardError::DuplicateRuleId(_))
    ));
}

// ============================================================================
// Content
// ============================================================================

#[test]
fn pattern_is_compiled_at_load_time() {
    let mut file = file_with_target("r");
    file.content = vec![content(ContentKind::Pattern, Some(r"\w+@\w+\.\w+"), None)];

    let spec = validate_rules(file).unwrap();

    assert!(matches!(spec.content[0].matcher, ContentMatcher::Pattern(_)));
}

#[test]
fn invalid_pattern_is_fatal() {
    let mut file = file_with_target("r");
    file.content = vec![content(ContentKind::Pattern, Some("(unclosed"), None)];

    assert!(matches!(
        validate_rules(file),
        Err(RepoGuardError::InvalidPattern { .. })
    ));
}

#[test]
fn contains_requires_expected() {
    let mut file = file_with_target("r");
    file.content = vec![content(ContentKind::Contains, None, None)];

    assert!(validate_rules(file).is_err());
}

#[test]
fn exact_allows_empty_expected() {
    let mut file = file_with_target("r");
    file.content = vec![content(ContentKind::Exact, Some(""), None)];

    assert!(validate_rules(file).is_ok());
}

#[test]
fn stat_requires_target() {
    let mut file = file_with_target("r");
    file.content = vec![content(ContentKind::Stat, Some("8"), None)];

    assert!(validate_rules(file).is_err());
}

#[test]
fn target_rejected_outside_stat() {
    let mut file = file_with_target("r");
    file.content = vec![content(ContentKind::Contains, Some("x"), Some("Members"))];

    assert!(validate_rules(file).is_err());
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn structure_duplicate_entry_is_rejected() {
    let mut file = file_with_target("r");
    file.structure = vec![structure(&["a.txt", "./a.txt"], false)];

    assert!(validate_rules(file).is_err());
}

#[test]
fn structure_allow_requires_closed_world() {
    let mut file = file_with_target("r");
    let mut rule = structure(&["a.txt"], false);
    rule.allow = vec!["docs/**".to_string()];
    file.structure = vec![rule];

    assert!(validate_rules(file).is_err());
}

#[test]
fn structure_invalid_glob_is_fatal() {
    let mut file = file_with_target("r");
    let mut rule = structure(&["a.txt"], true);
    rule.allow = vec!["docs/[".to_string()];
    file.structure = vec![rule];

    assert!(matches!(
        validate_rules(file),
        Err(RepoGuardError::InvalidGlob { .. })
    ));
}

#[test]
fn structure_root_dot_means_repository_root() {
    let mut file = file_with_target("r");
    let mut rule = structure(&["a.txt"], false);
    rule.root = Some(".".to_string());
    file.structure = vec![rule];

    let spec = validate_rules(file).unwrap();

    assert!(spec.structure[0].root.is_none());
    assert_eq!(spec.structure[0].mode, WorldMode::Open);
}

// ============================================================================
// Commit
// ============================================================================

#[test]
fn commit_patterns_honor_ignore_case() {
    let mut file = file_with_target("r");
    let mut rule = commit();
    rule.message = Some("update".to_string());
    file.commit = vec![rule.clone()];
    let spec = validate_rules(file).unwrap();
    assert!(spec.commit[0].message.as_ref().unwrap().is_match("UPDATE docs"));

    let mut file = file_with_target("r");
    rule.ignore_case = false;
    file.commit = vec![rule];
    let spec = validate_rules(file).unwrap();
    assert!(!spec.commit[0].message.as_ref().unwrap().is_match("UPDATE docs"));
}

#[test]
fn commit_min_count_zero_is_rejected() {
    let mut file = file_with_target("r");
    let mut rule = commit();
    rule.min_count = 0;
    file.commit = vec![rule];

    assert!(validate_rules(file).is_err());
}

#[test]
fn commit_within_days_zero_is_rejected() {
    let mut file = file_with_target("r");
    let mut rule = commit();
    rule.within_days = Some(0);
    file.commit = vec![rule];

    assert!(validate_rules(file).is_err());
}

#[test]
fn commit_within_days_above_limit_is_rejected() {
    let mut file = file_with_target("r");
    let mut rule = commit();
    rule.within_days = Some(4_000_000_000);
    file.commit = vec![rule];

    let err = validate_rules(file).unwrap_err();
    assert!(err.to_string().contains("within_days must be between 1 and 36500"));
}

#[test]
fn commit_within_days_at_limit_is_accepted() {
    let mut file = file_with_target("r");
    let mut rule = commit();
    rule.within_days = Some(MAX_WITHIN_DAYS);
    file.commit = vec![rule];

    assert_eq!(validate_rules(file).unwrap().commit[0].within_days, Some(MAX_WITHIN_DAYS));
}

#[test]
fn commit_files_are_normalized() {
    let mut file = file_with_target("r");
    let mut rule = commit();
    rule.files = vec!["./src/lib.rs".to_string()];
    file.commit = vec![rule];

    let spec = validate_rules(file).unwrap();

    assert_eq!(spec.commit[0].files, vec!["src/lib.rs".to_string()]);
    assert!(spec.commit[0].needs_changed_files());
}
