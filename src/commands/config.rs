use std::fmt::Write;
use std::path::Path;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::{RuleLoader, RuleSpec};
use crate::output::{ColorMode, print_fatal};
use crate::{EXIT_CONFIG_ERROR, EXIT_SUCCESS, Result};

#[must_use]
pub fn run_config(args: &ConfigArgs, color: ColorMode) -> i32 {
    match &args.action {
        ConfigAction::Validate { rules } => run_config_validate(rules, color),
    }
}

fn run_config_validate(rules_path: &Path, color: ColorMode) -> i32 {
    match run_config_validate_impl(rules_path) {
        Ok(spec) => {
            println!("Rule file is valid: {}", rules_path.display());
            print!("{}", format_rule_counts(&spec));
            EXIT_SUCCESS
        }
        Err(e) => {
            print_fatal(&e, color);
            EXIT_CONFIG_ERROR
        }
    }
}

/// Loads and validates a rule file. No network access.
///
/// # Errors
/// Returns an error if the file is missing, not valid TOML, or contains an invalid rule.
pub(crate) fn run_config_validate_impl(rules_path: &Path) -> Result<RuleSpec> {
    RuleLoader::new().load(Some(rules_path))
}

/// Target line followed by one `category: count` line per category.
#[must_use]
pub fn format_rule_counts(spec: &RuleSpec) -> String {
    let target = &spec.target;
    let repo = target
        .owner
        .as_ref()
        .map_or_else(|| target.repo.clone(), |owner| format!("{owner}/{}", target.repo));

    let mut out = String::new();
    let _ = writeln!(out, "Target: {repo}");
    if let Some(git_ref) = &target.git_ref {
        let _ = writeln!(out, "Ref: {git_ref}");
    }
    for (category, count) in spec.counts() {
        let _ = writeln!(out, "  {category}: {count}");
    }
    let _ = writeln!(out, "Total: {} rules", spec.rule_count());
    out
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
