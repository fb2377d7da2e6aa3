use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of fetching one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Present(Vec<u8>),
    Missing,
}

impl FileContent {
    #[must_use]
    pub const fn exists(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

/// Kind of an entry in a tree listing. Submodules are listed as directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Dir => f.write_str("dir"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: String,
    pub kind: EntryKind,
}

impl TreeEntry {
    #[must_use]
    pub fn new(path: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Recursive listing of a subtree.
///
/// `truncated` is set when the API did not return every entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeListing {
    pub entries: Vec<TreeEntry>,
    pub truncated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
    /// Hosting account login, when the commit email maps to an account.
    pub login: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub sha: String,
    pub author: CommitAuthor,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    /// Only populated when requested through [`CommitQuery::include_files`].
    pub changed_files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitQuery {
    pub limit: usize,
    pub include_files: bool,
    pub git_ref: Option<String>,
}

impl CommitQuery {
    #[must_use]
    pub const fn recent(limit: usize) -> Self {
        Self {
            limit,
            include_files: false,
            git_ref: None,
        }
    }

    #[must_use]
    pub const fn with_files(mut self, include_files: bool) -> Self {
        self.include_files = include_files;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    pub full_name: String,
    pub default_branch: String,
}
