use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};

use crate::config::{RealFileSystem, RuleLoader, RuleSpec};
use crate::fetch::{
    CommitAuthor, CommitQuery, CommitRecord, EntryKind, FetchError, FileContent, Fetcher,
    RepoInfo, TreeEntry, TreeListing,
};

/// Parse a rule file, panicking on invalid input.
pub fn rules(toml: &str) -> RuleSpec {
    RuleLoader::<RealFileSystem>::parse(toml).expect("valid rule file")
}

/// Fixed reference time for commit windows.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap()
}

pub fn commit(sha: &str, login: &str, message: &str, days_ago: i64) -> CommitRecord {
    CommitRecord {
        sha: sha.to_string(),
        author: CommitAuthor {
            name: format!("{login} name"),
            email: format!("{login}@example.com"),
            login: Some(login.to_string()),
        },
        timestamp: now() - chrono::Duration::days(days_ago),
        message: message.to_string(),
        changed_files: Vec::new(),
    }
}

/// In-memory [`Fetcher`]. Unknown files are missing; unknown trees are empty.
pub struct MockFetcher {
    files: HashMap<(String, Option<String>), Result<FileContent, FetchError>>,
    trees: HashMap<Option<String>, Result<TreeListing, FetchError>>,
    commits: Result<Vec<CommitRecord>, FetchError>,
    pub file_calls: Mutex<Vec<String>>,
    pub commit_queries: Mutex<Vec<CommitQuery>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            trees: HashMap::new(),
            commits: Ok(Vec::new()),
            file_calls: Mutex::new(Vec::new()),
            commit_queries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.with_file_result(path, None, Ok(FileContent::Present(content.as_bytes().to_vec())))
    }

    pub fn with_file_bytes(self, path: &str, bytes: &[u8]) -> Self {
        self.with_file_result(path, None, Ok(FileContent::Present(bytes.to_vec())))
    }

    pub fn with_file_at(self, path: &str, git_ref: &str, content: &str) -> Self {
        self.with_file_result(
            path,
            Some(git_ref),
            Ok(FileContent::Present(content.as_bytes().to_vec())),
        )
    }

    pub fn with_file_error(self, path: &str, error: FetchError) -> Self {
        self.with_file_result(path, None, Err(error))
    }

    fn with_file_result(
        mut self,
        path: &str,
        git_ref: Option<&str>,
        result: Result<FileContent, FetchError>,
    ) -> Self {
        self.files
            .insert((path.to_string(), git_ref.map(String::from)), result);
        self
    }

    pub fn with_tree(mut self, root: Option<&str>, entries: &[(&str, EntryKind)]) -> Self {
        let listing = TreeListing {
            entries: entries
                .iter()
                .map(|(path, kind)| TreeEntry::new(*path, *kind))
                .collect(),
            truncated: false,
        };
        self.trees.insert(root.map(String::from), Ok(listing));
        self
    }

    pub fn with_tree_result(
        mut self,
        root: Option<&str>,
        result: Result<TreeListing, FetchError>,
    ) -> Self {
        self.trees.insert(root.map(String::from), result);
        self
    }

    pub fn with_commits(mut self, commits: Vec<CommitRecord>) -> Self {
        self.commits = Ok(commits);
        self
    }

    pub fn with_commits_error(mut self, error: FetchError) -> Self {
        self.commits = Err(error);
        self
    }

    pub fn file_call_count(&self) -> usize {
        self.file_calls.lock().unwrap().len()
    }

    pub fn commit_query_count(&self) -> usize {
        self.commit_queries.lock().unwrap().len()
    }
}

impl Fetcher for MockFetcher {
    fn resolve_repository(&self) -> Result<RepoInfo, FetchError> {
        Ok(RepoInfo {
            full_name: "octo/demo".to_string(),
            default_branch: "main".to_string(),
        })
    }

    fn get_file_content(
        &self,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<FileContent, FetchError> {
        self.file_calls.lock().unwrap().push(path.to_string());
        self.files
            .get(&(path.to_string(), git_ref.map(String::from)))
            .cloned()
            .unwrap_or(Ok(FileContent::Missing))
    }

    fn list_tree(
        &self,
        root: Option<&str>,
        _git_ref: Option<&str>,
    ) -> Result<TreeListing, FetchError> {
        self.trees
            .get(&root.map(String::from))
            .cloned()
            .unwrap_or_else(|| Ok(TreeListing::default()))
    }

    fn list_recent_commits(&self, query: &CommitQuery) -> Result<Vec<CommitRecord>, FetchError> {
        self.commit_queries.lock().unwrap().push(query.clone());
        self.commits
            .clone()
            .map(|commits| commits.into_iter().take(query.limit).collect())
    }
}
