use std::fmt;

use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Credentials;

use super::http::{HttpClient, HttpResponse};
use super::types::{
    CommitAuthor, CommitQuery, CommitRecord, EntryKind, FileContent, RepoInfo, TreeEntry,
    TreeListing,
};
use super::{FetchError, Fetcher};

const ACCEPT_JSON: &str = "application/vnd.github+json";
const ACCEPT_RAW: &str = "application/vnd.github.raw";
const API_VERSION: &str = "2022-11-28";

/// GitHub answers 409 for git endpoints of a repository without commits.
const STATUS_EMPTY_REPOSITORY: u16 = 409;
const STATUS_NOT_FOUND: u16 = 404;

/// `owner/name` of the repository under verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocator {
    pub owner: String,
    pub name: String,
}

impl RepoLocator {
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// [`Fetcher`] backed by the GitHub REST API.
pub struct GitHubFetcher<C: HttpClient> {
    client: C,
    api_url: String,
    repo: RepoLocator,
    token: String,
    default_ref: Option<String>,
}

impl<C: HttpClient> fmt::Debug for GitHubFetcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubFetcher")
            .field("api_url", &self.api_url)
            .field("repo", &self.repo)
            .field("default_ref", &self.default_ref)
            .finish_non_exhaustive()
    }
}

impl<C: HttpClient> GitHubFetcher<C> {
    #[must_use]
    pub fn new(
        client: C,
        api_url: impl Into<String>,
        repo: RepoLocator,
        credentials: &Credentials,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            repo,
            token: credentials.token().to_string(),
            default_ref: None,
        }
    }

    /// Ref used whenever a call does not name one.
    #[must_use]
    pub fn with_default_ref(mut self, git_ref: impl Into<String>) -> Self {
        self.default_ref = Some(git_ref.into());
        self
    }

    fn effective_ref<'a>(&'a self, git_ref: Option<&'a str>) -> Option<&'a str> {
        git_ref.or(self.default_ref.as_deref())
    }

    /// `{api_url}/repos/{owner}/{name}/{segments...}`, each segment percent-encoded.
    fn endpoint<'s>(&self, segments: impl IntoIterator<Item = &'s str>) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| FetchError::Transport(format!("invalid API URL {}: {e}", self.api_url)))?;
        url.path_segments_mut()
            .map_err(|()| FetchError::Transport(format!("invalid API URL {}", self.api_url)))?
            .pop_if_empty()
            .extend(["repos", self.repo.owner.as_str(), self.repo.name.as_str()])
            .extend(segments);
        Ok(url)
    }

    fn request(&self, url: &Url, accept: &str) -> Result<HttpResponse, FetchError> {
        let authorization = format!("Bearer {}", self.token);
        let headers = [
            ("Authorization", authorization.as_str()),
            ("Accept", accept),
            ("X-GitHub-Api-Version", API_VERSION),
        ];
        debug!(url = %url, "GET");
        let response = self.client.get(url.as_str(), &headers)?;
        debug!(url = %url, status = response.status, bytes = response.body.len(), "response");
        Ok(response)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        let response = self.request(url, ACCEPT_JSON)?;
        if !response.is_success() {
            return Err(status_error(url, response.status));
        }
        decode(url, &response.body)
    }

    fn fetch_changed_files(&self, sha: &str) -> Result<Vec<String>, FetchError> {
        let url = self.endpoint(["commits", sha])?;
        let detail: CommitDetailPayload = self.get_json(&url)?;
        Ok(detail.files.into_iter().map(|f| f.filename).collect())
    }
}

impl<C: HttpClient> Fetcher for GitHubFetcher<C> {
    fn resolve_repository(&self) -> Result<RepoInfo, FetchError> {
        let url = self.endpoint(std::iter::empty())?;
        let payload: RepoPayload = self.get_json(&url)?;
        Ok(RepoInfo {
            full_name: payload.full_name,
            default_branch: payload.default_branch,
        })
    }

    fn get_file_content(
        &self,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<FileContent, FetchError> {
        let mut url = self.endpoint(std::iter::once("contents").chain(path.split('/')))?;
        if let Some(r) = self.effective_ref(git_ref) {
            url.query_pairs_mut().append_pair("ref", r);
        }

        let response = self.request(&url, ACCEPT_RAW)?;
        match response.status {
            STATUS_NOT_FOUND => Ok(FileContent::Missing),
            _ if response.is_success() => Ok(FileContent::Present(response.body)),
            status => Err(status_error(&url, status)),
        }
    }

    fn list_tree(
        &self,
        root: Option<&str>,
        git_ref: Option<&str>,
    ) -> Result<TreeListing, FetchError> {
        let tree_ref = self.effective_ref(git_ref).unwrap_or("HEAD");
        let mut url = self.endpoint(["git", "trees", tree_ref])?;
        url.query_pairs_mut().append_pair("recursive", "1");

        let response = self.request(&url, ACCEPT_JSON)?;
        if response.status == STATUS_EMPTY_REPOSITORY {
            debug!(repo = %self.repo, "repository is empty");
            return Ok(TreeListing::default());
        }
        if !response.is_success() {
            return Err(status_error(&url, response.status));
        }

        let payload: TreePayload = decode(&url, &response.body)?;
        if payload.truncated {
            warn!(repo = %self.repo, git_ref = tree_ref, "tree listing truncated by the API");
        }
        Ok(TreeListing {
            entries: scope_to_root(payload.tree, root),
            truncated: payload.truncated,
        })
    }

    fn list_recent_commits(&self, query: &CommitQuery) -> Result<Vec<CommitRecord>, FetchError> {
        let mut url = self.endpoint(["commits"])?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("per_page", &query.limit.to_string());
            if let Some(r) = self.effective_ref(query.git_ref.as_deref()) {
                pairs.append_pair("sha", r);
            }
        }

        let response = self.request(&url, ACCEPT_JSON)?;
        if response.status == STATUS_EMPTY_REPOSITORY {
            debug!(repo = %self.repo, "repository has no commits");
            return Ok(Vec::new());
        }
        if !response.is_success() {
            return Err(status_error(&url, response.status));
        }

        let payload: Vec<CommitPayload> = decode(&url, &response.body)?;
        payload
            .into_iter()
            .take(query.limit)
            .map(|item| -> Result<CommitRecord, FetchError> {
                let changed_files = if query.include_files {
                    self.fetch_changed_files(&item.sha)?
                } else {
                    Vec::new()
                };
                Ok(item.into_record(changed_files))
            })
            .collect()
    }
}

fn status_error(url: &Url, status: u16) -> FetchError {
    if status == STATUS_NOT_FOUND {
        FetchError::NotFound(url.to_string())
    } else {
        FetchError::Status {
            status,
            url: url.to_string(),
        }
    }
}

fn decode<T: DeserializeOwned>(url: &Url, body: &[u8]) -> Result<T, FetchError> {
    serde_json::from_slice(body).map_err(|e| FetchError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Keep entries below `root` and make their paths relative to it.
fn scope_to_root(items: Vec<TreeItemPayload>, root: Option<&str>) -> Vec<TreeEntry> {
    let prefix = root
        .map(|r| r.trim_matches('/'))
        .filter(|r| !r.is_empty())
        .map(|r| format!("{r}/"));

    items
        .into_iter()
        .filter_map(|item| {
            let kind = match item.kind.as_str() {
                "blob" => EntryKind::File,
                // "commit" entries are submodules
                "tree" | "commit" => EntryKind::Dir,
                _ => return None,
            };
            let path = match &prefix {
                Some(p) => item.path.strip_prefix(p.as_str())?.to_string(),
                None => item.path,
            };
            Some(TreeEntry::new(path, kind))
        })
        .collect()
}

#[derive(Deserialize)]
struct RepoPayload {
    full_name: String,
    default_branch: String,
}

#[derive(Deserialize)]
struct TreePayload {
    #[serde(default)]
    tree: Vec<TreeItemPayload>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Deserialize)]
struct TreeItemPayload {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct CommitPayload {
    sha: String,
    commit: GitCommitPayload,
    author: Option<AccountPayload>,
}

#[derive(Deserialize)]
struct GitCommitPayload {
    message: String,
    author: Option<GitSignaturePayload>,
    committer: Option<GitSignaturePayload>,
}

#[derive(Deserialize)]
struct GitSignaturePayload {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    date: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct AccountPayload {
    login: String,
}

#[derive(Deserialize)]
struct CommitDetailPayload {
    #[serde(default)]
    files: Vec<ChangedFilePayload>,
}

#[derive(Deserialize)]
struct ChangedFilePayload {
    filename: String,
}

impl CommitPayload {
    fn into_record(self, changed_files: Vec<String>) -> CommitRecord {
        let GitCommitPayload {
            message,
            author,
            committer,
        } = self.commit;
        let timestamp = author
            .as_ref()
            .and_then(|a| a.date)
            .or_else(|| committer.as_ref().and_then(|c| c.date))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        let (name, email) = author.map(|a| (a.name, a.email)).unwrap_or_default();

        CommitRecord {
            sha: self.sha,
            author: CommitAuthor {
                name,
                email,
                login: self.author.map(|a| a.login),
            },
            timestamp,
            message,
            changed_files,
        }
    }
}

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;
