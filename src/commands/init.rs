use std::fs;

use crate::cli::InitArgs;
use crate::output::{ColorMode, print_fatal};
use crate::{EXIT_CONFIG_ERROR, EXIT_SUCCESS, RepoGuardError, Result};

#[must_use]
pub fn run_init(args: &InitArgs, color: ColorMode) -> i32 {
    match run_init_impl(args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            print_fatal(&e, color);
            EXIT_CONFIG_ERROR
        }
    }
}

/// Writes a rule file template.
///
/// # Errors
/// Returns an error if the file already exists (without --force) or cannot be written.
pub fn run_init_impl(args: &InitArgs) -> Result<()> {
    let output_path = &args.output;

    if output_path.exists() && !args.force {
        return Err(RepoGuardError::Config(format!(
            "Rule file already exists: {}. Use --force to overwrite.",
            output_path.display()
        )));
    }

    fs::write(output_path, generate_rules_template())?;

    println!("Created rule file: {}", output_path.display());
    Ok(())
}

#[must_use]
pub fn generate_rules_template() -> String {
    r#"# repo-guard rule file
#
# Credentials are read from the environment, or from .mcp_env next to this file:
#   MCP_GITHUB_TOKEN  API token (required)
#   GITHUB_EVAL_ORG   default owner when target.repo has no "owner/" prefix

[target]
# Repository name, or owner/name
repo = "my-repo"
# Branch, tag or sha (default: the repository's default branch)
# ref = "main"
# Recent commits inspected by [[commit]] rules (1-100)
commit_limit = 20

# Environment variables that must be set
# [[env]]
# var = "DEPLOY_ENV"
# pattern = "^(staging|production)$"

# Files that must exist
[[existence]]
path = "README.md"

# Files that must not exist
# [[existence]]
# path = ".env"
# exists = false

# Directory layout. With closed_world = true, any entry that is neither listed
# nor matched by `allow` fails the check.
[[structure]]
closed_world = false
entries = [
    { path = "README.md", kind = "file" },
    # { path = "src", kind = "dir" },
]
# allow = ["*.md", ".github/**"]

# File content: kind = "exact" | "contains" | "pattern" | "stat"
[[content]]
path = "README.md"
kind = "contains"
expected = "License"

# [[content]]
# path = "COVERAGE.md"
# kind = "stat"
# target = "Coverage"
# expected = "90"

# Recent commit history
# [[commit]]
# author = "dependabot"
# message = "^chore"
# within_days = 30
# min_count = 1
"#
    .to_string()
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
