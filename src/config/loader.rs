use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{RepoGuardError, Result};

use super::model::RuleFile;
use super::rules::RuleSpec;
use super::validation::validate_rules;

pub const DEFAULT_RULES_FILE: &str = "repo-guard.toml";

/// Trait for filesystem operations (for testability).
pub trait FileSystem {
    /// Read file contents as a string.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;

    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Real filesystem implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Loads and validates a rule file.
///
/// Without an explicit path, `repo-guard.toml` in the current directory is used.
#[derive(Debug, Default)]
pub struct RuleLoader<F: FileSystem = RealFileSystem> {
    fs: F,
}

impl RuleLoader<RealFileSystem> {
    #[must_use]
    pub const fn new() -> Self {
        Self { fs: RealFileSystem }
    }
}

impl<F: FileSystem> RuleLoader<F> {
    #[must_use]
    pub const fn with_fs(fs: F) -> Self {
        Self { fs }
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// # Errors
    /// Returns an error if the file is missing, unreadable, not valid TOML, or
    /// contains an invalid rule.
    pub fn load(&self, path: Option<&Path>) -> Result<RuleSpec> {
        let path = path.map_or_else(|| PathBuf::from(DEFAULT_RULES_FILE), Path::to_path_buf);
        if !self.fs.exists(&path) {
            return Err(RepoGuardError::Config(format!(
                "Rule file not found: {}. Run `repo-guard init` to create one.",
                path.display()
            )));
        }

        let content = self
            .fs
            .read_to_string(&path)
            .map_err(|source| RepoGuardError::FileRead {
                path: path.clone(),
                source,
            })?;
        let spec = Self::parse(&content)?;
        debug!(path = %path.display(), rules = spec.rule_count(), "loaded rule file");
        Ok(spec)
    }

    /// Parse and validate rule file content.
    ///
    /// # Errors
    /// Returns an error if the content is not valid TOML or contains an invalid rule.
    pub fn parse(content: &str) -> Result<RuleSpec> {
        let file: RuleFile = toml::from_str(content)?;
        validate_rules(file)
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
