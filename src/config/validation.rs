use std::collections::HashSet;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use regex::{Regex, RegexBuilder};

use crate::error::{RepoGuardError, Result};

use super::model::{
    CommitRuleConfig, ContentKind, ContentRuleConfig, EnvRuleConfig, ExistenceRuleConfig,
    MAX_COMMIT_LIMIT, MAX_WITHIN_DAYS, RuleFile, StructureRuleConfig, TargetConfig,
};
use super::rules::{
    CommitRule, ContentMatcher, ContentRule, EnvRule, ExistenceRule, ExpectedEntry, RuleSpec,
    StructureRule, Target, WorldMode, split_repo,
};

/// Check if a string is a valid remote URL (http:// or https://).
#[must_use]
pub fn is_remote_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Turn a parsed rule file into a [`RuleSpec`].
///
/// Every malformed entry is rejected here so that evaluation never sees one.
///
/// # Errors
/// Returns the first problem found: invalid paths, patterns, limits or duplicate ids.
pub fn validate_rules(file: RuleFile) -> Result<RuleSpec> {
    let mut ids = RuleIds::default();

    let target = validate_target(file.target)?;

    let env = file
        .env
        .into_iter()
        .map(|rule| validate_env(rule, &mut ids))
        .collect::<Result<Vec<_>>>()?;

    let existence = file
        .existence
        .into_iter()
        .map(|rule| validate_existence(rule, &mut ids))
        .collect::<Result<Vec<_>>>()?;

    let structure = file
        .structure
        .into_iter()
        .enumerate()
        .map(|(i, rule)| validate_structure(i + 1, rule, &mut ids))
        .collect::<Result<Vec<_>>>()?;

    let content = file
        .content
        .into_iter()
        .enumerate()
        .map(|(i, rule)| validate_content(i + 1, rule, &mut ids))
        .collect::<Result<Vec<_>>>()?;

    let commit = file
        .commit
        .into_iter()
        .enumerate()
        .map(|(i, rule)| validate_commit(i + 1, rule, &mut ids))
        .collect::<Result<Vec<_>>>()?;

    Ok(RuleSpec {
        target,
        env,
        existence,
        structure,
        content,
        commit,
    })
}

/// Rule ids seen so far. Ids are unique across all categories.
#[derive(Default)]
struct RuleIds {
    seen: HashSet<String>,
}

impl RuleIds {
    fn claim(
        &mut self,
        explicit: Option<String>,
        fallback: impl FnOnce() -> String,
    ) -> Result<String> {
        let id = explicit
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(fallback);
        if !self.seen.insert(id.clone()) {
            return Err(RepoGuardError::DuplicateRuleId(id));
        }
        Ok(id)
    }
}

fn validate_target(target: TargetConfig) -> Result<Target> {
    let (repo_owner, repo) = split_repo(&target.repo)?;
    let owner = match (repo_owner, non_empty(target.owner)) {
        (Some(a), Some(b)) if a != b => {
            return Err(RepoGuardError::Config(format!(
                "target.repo names owner '{a}' but target.owner is '{b}'"
            )));
        }
        (a, b) => a.or(b),
    };

    if !(1..=MAX_COMMIT_LIMIT).contains(&target.commit_limit) {
        return Err(RepoGuardError::Config(format!(
            "target.commit_limit must be between 1 and {MAX_COMMIT_LIMIT}, got {}",
            target.commit_limit
        )));
    }

    let api_url = target.api_url.trim_end_matches('/').to_string();
    if !is_remote_url(&api_url) {
        return Err(RepoGuardError::Config(format!(
            "target.api_url must start with http:// or https://: {api_url}"
        )));
    }

    Ok(Target {
        owner,
        repo,
        git_ref: validate_ref("target", target.git_ref)?,
        commit_limit: target.commit_limit,
        api_url,
    })
}

fn validate_env(rule: EnvRuleConfig, ids: &mut RuleIds) -> Result<EnvRule> {
    let var = rule.var.trim().to_string();
    if var.is_empty() || var.contains('=') {
        return Err(RepoGuardError::Config(format!(
            "Invalid environment variable name in env rule: '{}'",
            rule.var
        )));
    }
    let id = ids.claim(rule.id, || format!("env:{var}"))?;
    let pattern = rule
        .pattern
        .map(|p| compile_regex(&id, &p, false))
        .transpose()?;
    Ok(EnvRule { id, var, pattern })
}

fn validate_existence(rule: ExistenceRuleConfig, ids: &mut RuleIds) -> Result<ExistenceRule> {
    let path = normalize_repo_path("existence", &rule.path)?;
    let id = ids.claim(rule.id, || format!("existence:{path}"))?;
    Ok(ExistenceRule {
        git_ref: validate_ref(&id, rule.git_ref)?,
        id,
        path,
        expected: rule.exists,
    })
}

fn validate_structure(
    index: usize,
    rule: StructureRuleConfig,
    ids: &mut RuleIds,
) -> Result<StructureRule> {
    let id = ids.claim(rule.id, || format!("structure-{index}"))?;
    let root = rule
        .root
        .filter(|r| !matches!(r.trim(), "" | "." | "/"))
        .map(|r| normalize_repo_path(&id, &r))
        .transpose()?;

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(rule.entries.len());
    for entry in rule.entries {
        let path = normalize_repo_path(&id, &entry.path)?;
        if !seen.insert(path.clone()) {
            return Err(RepoGuardError::Config(format!(
                "Rule {id} lists '{path}' more than once"
            )));
        }
        entries.push(ExpectedEntry {
            path,
            kind: entry.kind,
        });
    }

    if !rule.closed_world && !rule.allow.is_empty() {
        return Err(RepoGuardError::Config(format!(
            "Rule {id} sets `allow` but is not closed_world"
        )));
    }

    Ok(StructureRule {
        allow: build_glob_set(&id, &rule.allow)?,
        git_ref: validate_ref(&id, rule.git_ref)?,
        mode: if rule.closed_world {
            WorldMode::Closed
        } else {
            WorldMode::Open
        },
        id,
        root,
        entries,
    })
}

fn validate_content(
    index: usize,
    rule: ContentRuleConfig,
    ids: &mut RuleIds,
) -> Result<ContentRule> {
    let path = normalize_repo_path("content", &rule.path)?;
    let id = ids.claim(rule.id, || format!("content-{index}:{path}"))?;

    if rule.kind != ContentKind::Stat && rule.target.is_some() {
        return Err(RepoGuardError::Config(format!(
            "Rule {id}: `target` is only valid for kind = \"stat\""
        )));
    }

    let missing = |field: &str| {
        RepoGuardError::Config(format!("Rule {id}: `{field}` is required for this kind"))
    };

    let matcher = match rule.kind {
        ContentKind::Exact => {
            ContentMatcher::Exact(rule.expected.ok_or_else(|| missing("expected"))?)
        }
        ContentKind::Contains => {
            let expected = non_empty(rule.expected).ok_or_else(|| missing("expected"))?;
            ContentMatcher::Contains(expected)
        }
        ContentKind::Pattern => {
            let expected = non_empty(rule.expected).ok_or_else(|| missing("expected"))?;
            ContentMatcher::Pattern(compile_regex(&id, &expected, false)?)
        }
        ContentKind::Stat => ContentMatcher::Stat {
            target: non_empty(rule.target).ok_or_else(|| missing("target"))?,
            expected: non_empty(rule.expected)
                .map(|e| e.trim().to_string())
                .ok_or_else(|| missing("expected"))?,
        },
    };

    Ok(ContentRule {
        git_ref: validate_ref(&id, rule.git_ref)?,
        id,
        path,
        matcher,
    })
}

fn validate_commit(index: usize, rule: CommitRuleConfig, ids: &mut RuleIds) -> Result<CommitRule> {
    let id = ids.claim(rule.id, || format!("commit-{index}"))?;

    if rule.min_count == 0 {
        return Err(RepoGuardError::Config(format!(
            "Rule {id}: min_count must be at least 1"
        )));
    }
    if let Some(days) = rule.within_days.filter(|d| !(1..=MAX_WITHIN_DAYS).contains(d)) {
        return Err(RepoGuardError::Config(format!(
            "Rule {id}: within_days must be between 1 and {MAX_WITHIN_DAYS}, got {days}"
        )));
    }

    let author = non_empty(rule.author)
        .map(|p| compile_regex(&id, &p, rule.ignore_case))
        .transpose()?;
    let message = non_empty(rule.message)
        .map(|p| compile_regex(&id, &p, rule.ignore_case))
        .transpose()?;
    let files = rule
        .files
        .iter()
        .map(|f| normalize_repo_path(&id, f))
        .collect::<Result<Vec<_>>>()?;

    Ok(CommitRule {
        id,
        min_count: rule.min_count,
        author,
        message,
        within_days: rule.within_days,
        files,
    })
}

/// Normalize a repository-relative path: strip `./` and trailing `/`, reject
/// absolute paths, `..`, backslashes and empty segments.
fn normalize_repo_path(rule: &str, raw: &str) -> Result<String> {
    let invalid = |why: &str| {
        RepoGuardError::Config(format!("Rule {rule}: invalid path '{raw}' ({why})"))
    };

    let trimmed = raw.trim();
    if trimmed.starts_with('/') {
        return Err(invalid("must be repository-relative"));
    }
    if trimmed.contains('\\') {
        return Err(invalid("use '/' as separator"));
    }

    let path = trimmed.strip_prefix("./").unwrap_or(trimmed).trim_end_matches('/');
    if path.is_empty() {
        return Err(invalid("empty"));
    }
    if path.split('/').any(|segment| segment.is_empty()) {
        return Err(invalid("empty segment"));
    }
    if path.split('/').any(|segment| segment == "." || segment == "..") {
        return Err(invalid("'.' and '..' segments are not allowed"));
    }
    Ok(path.to_string())
}

fn validate_ref(rule: &str, git_ref: Option<String>) -> Result<Option<String>> {
    match git_ref {
        Some(r) if r.trim().is_empty() => Err(RepoGuardError::Config(format!(
            "Rule {rule}: `ref` must not be empty"
        ))),
        other => Ok(other.map(|r| r.trim().to_string())),
    }
}

fn compile_regex(rule: &str, pattern: &str, ignore_case: bool) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(ignore_case)
        .build()
        .map_err(|source| RepoGuardError::InvalidPattern {
            rule: rule.to_string(),
            pattern: pattern.to_string(),
            source,
        })
}

fn build_glob_set(rule: &str, patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| RepoGuardError::InvalidGlob {
                rule: rule.to_string(),
                pattern: pattern.clone(),
                source,
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| RepoGuardError::InvalidGlob {
        rule: rule.to_string(),
        pattern: patterns.join(", "),
        source,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
