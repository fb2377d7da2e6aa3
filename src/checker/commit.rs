use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use crate::config::{CommitRule, RuleSpec};
use crate::fetch::{CommitQuery, CommitRecord, Fetcher};

use super::{Category, Evaluator, Verdict};

/// Detail used for every constraint when the history is empty.
pub const NO_COMMITS: &str = "no commits found";

/// Evaluates constraints over the most recent commits.
///
/// History is fetched once for all constraints; each constraint yields one
/// verdict aggregated over the fetched commits.
pub struct CommitEvaluator<'a> {
    fetcher: &'a dyn Fetcher,
    now: DateTime<Utc>,
}

impl<'a> CommitEvaluator<'a> {
    #[must_use]
    pub const fn new(fetcher: &'a dyn Fetcher, now: DateTime<Utc>) -> Self {
        Self { fetcher, now }
    }

    fn check(&self, rule: &CommitRule, commits: &[CommitRecord]) -> Verdict {
        let matching = commits.iter().filter(|c| self.matches(rule, c)).count();
        let criteria = describe(rule);
        let required = rule.min_count;
        let detail = format!(
            "{matching} of the {} most recent commits match ({criteria}), \
             required at least {required}",
            commits.len()
        );

        if matching >= required {
            Verdict::pass(&rule.id, Category::Commit, detail)
        } else {
            Verdict::fail(&rule.id, Category::Commit, detail)
                .with_evidence(format!("at least {required}"), matching.to_string())
        }
    }

    /// Earliest timestamp inside a window of `days`. `None` when the window
    /// reaches past the representable range, which imposes no lower bound.
    fn window_start(&self, days: u32) -> Option<DateTime<Utc>> {
        TimeDelta::try_days(i64::from(days)).and_then(|span| self.now.checked_sub_signed(span))
    }

    fn matches(&self, rule: &CommitRule, commit: &CommitRecord) -> bool {
        let author_ok = rule.author.as_ref().is_none_or(|re| {
            let author = &commit.author;
            author.login.as_deref().is_some_and(|login| re.is_match(login))
                || re.is_match(&author.name)
                || re.is_match(&author.email)
        });
        let message_ok = rule
            .message
            .as_ref()
            .is_none_or(|re| re.is_match(&commit.message));
        let window_ok = rule
            .within_days
            .and_then(|days| self.window_start(days))
            .is_none_or(|start| commit.timestamp >= start);
        let files_ok = rule
            .files
            .iter()
            .all(|f| commit.changed_files.iter().any(|changed| changed == f));

        author_ok && message_ok && window_ok && files_ok
    }
}

impl Evaluator for CommitEvaluator<'_> {
    fn category(&self) -> Category {
        Category::Commit
    }

    fn evaluate(&self, spec: &RuleSpec) -> Vec<Verdict> {
        if spec.commit.is_empty() {
            return Vec::new();
        }

        let query = CommitQuery::recent(spec.target.commit_limit)
            .with_files(spec.commit.iter().any(CommitRule::needs_changed_files));

        match self.fetcher.list_recent_commits(&query) {
            Err(e) => spec
                .commit
                .iter()
                .map(|rule| {
                    Verdict::error(
                        &rule.id,
                        Category::Commit,
                        format!("could not fetch recent commits: {e}"),
                    )
                })
                .collect(),
            Ok(commits) if commits.is_empty() => spec
                .commit
                .iter()
                .map(|rule| {
                    Verdict::fail(&rule.id, Category::Commit, NO_COMMITS)
                        .with_evidence(format!("at least {}", rule.min_count), "0")
                })
                .collect(),
            Ok(commits) => {
                debug!(commits = commits.len(), "evaluating commit constraints");
                spec.commit
                    .iter()
                    .map(|rule| self.check(rule, &commits))
                    .collect()
            }
        }
    }
}

/// Human-readable summary of a constraint's filters.
fn describe(rule: &CommitRule) -> String {
    let mut parts = Vec::new();
    if let Some(re) = &rule.author {
        parts.push(format!("author ~ /{}/", re.as_str()));
    }
    if let Some(re) = &rule.message {
        parts.push(format!("message ~ /{}/", re.as_str()));
    }
    if let Some(days) = rule.within_days {
        parts.push(format!("within {days} days"));
    }
    if !rule.files.is_empty() {
        parts.push(format!("touching {}", rule.files.join(", ")));
    }
    if parts.is_empty() {
        "any commit".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
#[path = "commit_tests.rs"]
mod tests;
