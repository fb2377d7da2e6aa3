use globset::GlobSet;
use indexmap::IndexMap;
use regex::Regex;

use crate::checker::Category;
use crate::error::{RepoGuardError, Result};
use crate::fetch::RepoLocator;

use super::env::{Credentials, ORG_VAR};
use super::model::ExpectedKind;

/// Validated rule set. Immutable once loaded; evaluators only borrow it.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    pub target: Target,
    pub env: Vec<EnvRule>,
    pub existence: Vec<ExistenceRule>,
    pub structure: Vec<StructureRule>,
    pub content: Vec<ContentRule>,
    pub commit: Vec<CommitRule>,
}

impl RuleSpec {
    /// Number of rules per category, in evaluation order.
    #[must_use]
    pub fn counts(&self) -> IndexMap<Category, usize> {
        Category::ALL
            .into_iter()
            .map(|category| {
                let count = match category {
                    Category::Env => self.env.len(),
                    Category::Existence => self.existence.len(),
                    Category::Structure => self.structure.len(),
                    Category::Content => self.content.len(),
                    Category::Commit => self.commit.len(),
                };
                (category, count)
            })
            .collect()
    }

    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.counts().values().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub owner: Option<String>,
    pub repo: String,
    pub git_ref: Option<String>,
    pub commit_limit: usize,
    pub api_url: String,
}

impl Target {
    /// Replace the repository, accepting `name` or `owner/name`.
    ///
    /// # Errors
    /// Returns an error if `value` is not a valid repository reference.
    pub fn set_repo(&mut self, value: &str) -> Result<()> {
        let (owner, repo) = split_repo(value)?;
        if owner.is_some() {
            self.owner = owner;
        }
        self.repo = repo;
        Ok(())
    }

    /// Resolve `owner/name`, falling back to the organization from the credentials.
    ///
    /// # Errors
    /// Returns an error if no owner is configured anywhere.
    pub fn locator(&self, credentials: &Credentials) -> Result<RepoLocator> {
        let owner = self
            .owner
            .as_deref()
            .or_else(|| credentials.org())
            .ok_or_else(|| {
                RepoGuardError::Config(format!(
                    "No repository owner: set target.owner, pass --repo OWNER/NAME, or set {ORG_VAR}"
                ))
            })?;
        Ok(RepoLocator::new(owner, self.repo.clone()))
    }
}

/// Split `name` or `owner/name`.
pub(super) fn split_repo(value: &str) -> Result<(Option<String>, String)> {
    let value = value.trim();
    let invalid = || RepoGuardError::Config(format!("Invalid repository reference: '{value}'"));

    match value.split_once('/') {
        None if !value.is_empty() => Ok((None, value.to_string())),
        Some((owner, name))
            if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
        {
            Ok((Some(owner.to_string()), name.to_string()))
        }
        _ => Err(invalid()),
    }
}

#[derive(Debug, Clone)]
pub struct EnvRule {
    pub id: String,
    pub var: String,
    pub pattern: Option<Regex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistenceRule {
    pub id: String,
    pub path: String,
    /// Whether the file is expected to exist.
    pub expected: bool,
    pub git_ref: Option<String>,
}

/// Whether entries outside the expected set are ignored or rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WorldMode {
    #[default]
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedEntry {
    pub path: String,
    pub kind: ExpectedKind,
}

#[derive(Debug, Clone)]
pub struct StructureRule {
    pub id: String,
    pub root: Option<String>,
    pub mode: WorldMode,
    pub entries: Vec<ExpectedEntry>,
    /// Exemptions from the closed-world check.
    pub allow: GlobSet,
    pub git_ref: Option<String>,
}

/// How file content is matched.
#[derive(Debug, Clone)]
pub enum ContentMatcher {
    /// Equal after trailing whitespace is stripped from every line.
    Exact(String),
    Contains(String),
    Pattern(Regex),
    /// A line containing `target` whose first number equals `expected`.
    Stat { target: String, expected: String },
}

impl ContentMatcher {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Exact(_) => "exact",
            Self::Contains(_) => "contains",
            Self::Pattern(_) => "pattern",
            Self::Stat { .. } => "stat",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContentRule {
    pub id: String,
    pub path: String,
    pub git_ref: Option<String>,
    pub matcher: ContentMatcher,
}

#[derive(Debug, Clone)]
pub struct CommitRule {
    pub id: String,
    pub min_count: usize,
    pub author: Option<Regex>,
    pub message: Option<Regex>,
    pub within_days: Option<u32>,
    pub files: Vec<String>,
}

impl CommitRule {
    #[must_use]
    pub fn needs_changed_files(&self) -> bool {
        !self.files.is_empty()
    }
}
