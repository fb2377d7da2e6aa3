//! Read-only access to repository data on the hosting API.
//!
//! Evaluators only see the [`Fetcher`] trait. The GitHub implementation lives
//! in [`github`] and talks HTTP through the [`HttpClient`] seam so it can be
//! driven by canned responses in tests.

mod github;
mod http;
mod types;

pub use github::{GitHubFetcher, RepoLocator};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use types::{
    CommitAuthor, CommitQuery, CommitRecord, EntryKind, FileContent, RepoInfo, TreeEntry,
    TreeListing,
};

use thiserror::Error;

/// Failure to retrieve data. "Does not exist" is not a `FetchError` for file
/// content; it is reported as [`FileContent::Missing`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// Read-only repository data source.
///
/// `git_ref` of `None` means the fetcher's default ref. Implementations must be
/// `Sync`: evaluators may fetch independent paths from several threads.
pub trait Fetcher: Sync {
    /// Confirm the repository exists and report its metadata.
    ///
    /// # Errors
    /// Returns [`FetchError::NotFound`] if the repository cannot be resolved.
    fn resolve_repository(&self) -> Result<RepoInfo, FetchError>;

    /// Fetch the raw bytes of a file.
    ///
    /// # Errors
    /// Returns an error on transport or auth failure. A missing file is `Ok(FileContent::Missing)`.
    fn get_file_content(&self, path: &str, git_ref: Option<&str>)
    -> Result<FileContent, FetchError>;

    /// List every entry below `root` (or the repository root), recursively.
    /// Entry paths are relative to `root`.
    ///
    /// # Errors
    /// Returns an error on transport or auth failure.
    fn list_tree(&self, root: Option<&str>, git_ref: Option<&str>)
    -> Result<TreeListing, FetchError>;

    /// Most recent commits first. An empty repository yields an empty list.
    ///
    /// # Errors
    /// Returns an error on transport or auth failure.
    fn list_recent_commits(&self, query: &CommitQuery) -> Result<Vec<CommitRecord>, FetchError>;
}
