use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_COMMIT_LIMIT: usize = 20;
/// Upper bound of the commits endpoint's `per_page`.
pub const MAX_COMMIT_LIMIT: usize = 100;
/// Longest accepted commit time window, in days.
pub const MAX_WITHIN_DAYS: u32 = 36_500;

// ============================================================================
// Rule file as written on disk. Validated into `RuleSpec` before use.
// ============================================================================

/// Top-level rule file. One array of tables per rule category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RuleFile {
    pub target: TargetConfig,

    #[serde(default)]
    pub env: Vec<EnvRuleConfig>,

    #[serde(default)]
    pub existence: Vec<ExistenceRuleConfig>,

    #[serde(default)]
    pub structure: Vec<StructureRuleConfig>,

    #[serde(default)]
    pub content: Vec<ContentRuleConfig>,

    #[serde(default)]
    pub commit: Vec<CommitRuleConfig>,
}

/// Repository under verification [target].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Repository name, or `owner/name`.
    pub repo: String,

    /// Owner (user or organization). Falls back to `GITHUB_EVAL_ORG`.
    #[serde(default)]
    pub owner: Option<String>,

    /// Branch, tag or sha. Defaults to the repository's default branch.
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,

    /// Number of recent commits fetched for commit rules.
    #[serde(default = "default_commit_limit")]
    pub commit_limit: usize,

    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            repo: String::new(),
            owner: None,
            git_ref: None,
            commit_limit: default_commit_limit(),
            api_url: default_api_url(),
        }
    }
}

/// Required environment variable [[env]].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EnvRuleConfig {
    #[serde(default)]
    pub id: Option<String>,

    pub var: String,

    /// Regex the value must match.
    #[serde(default)]
    pub pattern: Option<String>,
}

/// File that must (or must not) exist [[existence]].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExistenceRuleConfig {
    #[serde(default)]
    pub id: Option<String>,

    pub path: String,

    /// `false` asserts the file is absent.
    #[serde(default = "default_true")]
    pub exists: bool,

    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
}

/// Expected directory layout [[structure]].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StructureRuleConfig {
    #[serde(default)]
    pub id: Option<String>,

    /// Subtree to check. Entry paths are relative to it.
    #[serde(default)]
    pub root: Option<String>,

    /// Fail on entries that are neither expected nor allowed.
    #[serde(default)]
    pub closed_world: bool,

    #[serde(default)]
    pub entries: Vec<StructureEntryConfig>,

    /// Glob patterns exempt from the closed-world check.
    #[serde(default)]
    pub allow: Vec<String>,

    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StructureEntryConfig {
    pub path: String,

    #[serde(default)]
    pub kind: ExpectedKind,
}

/// What kind of tree entry an expected path must be.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedKind {
    #[default]
    Any,
    File,
    Dir,
}

/// Content check on one file [[content]].
///
/// `expected` and `target` are interpreted according to `kind`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ContentRuleConfig {
    #[serde(default)]
    pub id: Option<String>,

    pub path: String,

    pub kind: ContentKind,

    #[serde(default)]
    pub expected: Option<String>,

    /// Line marker for `stat` rules.
    #[serde(default)]
    pub target: Option<String>,

    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Exact,
    Contains,
    Pattern,
    Stat,
}

/// Constraint over recent commit history [[commit]].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CommitRuleConfig {
    #[serde(default)]
    pub id: Option<String>,

    /// Minimum number of matching commits.
    #[serde(default = "default_min_count")]
    pub min_count: usize,

    /// Regex over author login, name or email.
    #[serde(default)]
    pub author: Option<String>,

    /// Regex over the commit message.
    #[serde(default)]
    pub message: Option<String>,

    /// Only commits authored within this many days count.
    #[serde(default)]
    pub within_days: Option<u32>,

    /// Paths every matching commit must touch.
    #[serde(default)]
    pub files: Vec<String>,

    #[serde(default = "default_true")]
    pub ignore_case: bool,
}

const fn default_true() -> bool {
    true
}

const fn default_min_count() -> usize {
    1
}

const fn default_commit_limit() -> usize {
    DEFAULT_COMMIT_LIMIT
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}
