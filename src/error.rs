use std::path::PathBuf;

use thiserror::Error;

use crate::fetch::FetchError;

/// Fatal errors: anything that stops a run before the first rule is evaluated.
///
/// Rule-level problems (a missing file, a failed request for one path) never
/// surface here; evaluators turn those into error verdicts.
#[derive(Error, Debug)]
pub enum RepoGuardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing credential: {var} is not set")]
    MissingCredential { var: String },

    #[error("Invalid regex in rule {rule}: {pattern}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid glob in rule {rule}: {pattern}")]
    InvalidGlob {
        rule: String,
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Duplicate rule id: {0}")]
    DuplicateRuleId(String),

    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Failed to resolve repository {repo}")]
    RepoResolve {
        repo: String,
        #[source]
        source: FetchError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialize(#[from] serde_json::Error),
}

impl RepoGuardError {
    /// Short category label used as the heading of fatal error output.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Config(_) | Self::DuplicateRuleId(_) => "Config",
            Self::FileRead { .. } | Self::Io(_) => "IO",
            Self::MissingCredential { .. } => "Credentials",
            Self::InvalidPattern { .. } | Self::InvalidGlob { .. } => "Pattern",
            Self::RepoNotFound(_) | Self::RepoResolve { .. } => "Repository",
            Self::TomlParse(_) => "Syntax",
            Self::JsonSerialize(_) => "Output",
        }
    }

    /// Underlying cause, if the error wraps one.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::FileRead { source, .. } => Some(source.to_string()),
            Self::InvalidPattern { source, .. } => Some(source.to_string()),
            Self::InvalidGlob { source, .. } => Some(source.to_string()),
            Self::RepoResolve { source, .. } => Some(source.to_string()),
            _ => None,
        }
    }

    /// Actionable hint for the user.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::MissingCredential { .. } => Some(
                "set it in the environment or in the env file passed with --env-file (default: .mcp_env)",
            ),
            Self::RepoNotFound(_) => {
                Some("check the owner/repository name and that the token can read it")
            }
            Self::DuplicateRuleId(_) => Some("give every rule a unique `id`"),
            Self::TomlParse(_) => Some("run `repo-guard config validate` to check the rule file"),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RepoGuardError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
