use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::error::{RepoGuardError, Result};

/// Env file read before credentials are resolved.
pub const DEFAULT_ENV_FILE: &str = ".mcp_env";
pub const TOKEN_VAR: &str = "MCP_GITHUB_TOKEN";
pub const ORG_VAR: &str = "GITHUB_EVAL_ORG";

/// Source of environment variables (for testability).
pub trait Environment: Sync {
    /// Value of `name`, or `None` if unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed set of variables, for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }
}

impl Environment for MapEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Load `KEY=value` pairs from an env file into the process environment.
///
/// Variables already set in the process win over the file. A missing file is
/// only an error when the caller asked for it explicitly.
///
/// # Errors
/// Returns an error if an explicitly requested file is missing or unparseable.
pub fn load_env_file(path: &Path, explicit: bool) -> Result<()> {
    if !path.exists() {
        if explicit {
            return Err(RepoGuardError::Config(format!(
                "Env file not found: {}",
                path.display()
            )));
        }
        debug!(path = %path.display(), "no env file, using process environment only");
        return Ok(());
    }

    dotenvy::from_path(path).map_err(|e| {
        RepoGuardError::Config(format!("Failed to load env file {}: {e}", path.display()))
    })?;
    debug!(path = %path.display(), "loaded env file");
    Ok(())
}

/// API credentials, constructed once at startup and handed to the fetcher.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
    org: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("org", &self.org)
            .finish()
    }
}

impl Credentials {
    #[must_use]
    pub fn new(token: impl Into<String>, org: Option<String>) -> Self {
        Self {
            token: token.into(),
            org,
        }
    }

    /// Read the token and default organization from `env`.
    ///
    /// # Errors
    /// Returns [`RepoGuardError::MissingCredential`] if the token is unset or blank.
    pub fn from_env(env: &dyn Environment) -> Result<Self> {
        let token = non_blank(env.var(TOKEN_VAR)).ok_or_else(|| {
            RepoGuardError::MissingCredential {
                var: TOKEN_VAR.to_string(),
            }
        })?;
        let org = non_blank(env.var(ORG_VAR));
        Ok(Self { token, org })
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn org(&self) -> Option<&str> {
        self.org.as_deref()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
