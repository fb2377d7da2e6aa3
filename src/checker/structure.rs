use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::config::{ExpectedKind, RuleSpec, StructureRule, WorldMode};
use crate::fetch::{EntryKind, Fetcher, TreeEntry, TreeListing};

use super::{Category, Evaluator, Verdict};

/// Compares a fetched tree listing against an expected layout.
///
/// Emits one verdict per mismatch, or a single passing verdict for the rule
/// when nothing is wrong.
pub struct StructureEvaluator<'a> {
    fetcher: &'a dyn Fetcher,
}

impl<'a> StructureEvaluator<'a> {
    #[must_use]
    pub const fn new(fetcher: &'a dyn Fetcher) -> Self {
        Self { fetcher }
    }

    fn check(&self, rule: &StructureRule) -> Vec<Verdict> {
        let scope = rule.root.as_deref().unwrap_or(".");
        let listing = match self
            .fetcher
            .list_tree(rule.root.as_deref(), rule.git_ref.as_deref())
        {
            Ok(listing) => listing,
            Err(e) => {
                return vec![Verdict::error(
                    &rule.id,
                    Category::Structure,
                    format!("could not list tree under {scope}: {e}"),
                )];
            }
        };

        if listing.truncated {
            return vec![Verdict::error(
                &rule.id,
                Category::Structure,
                format!(
                    "tree listing under {scope} was truncated by the API; layout cannot be verified"
                ),
            )];
        }

        debug!(rule = %rule.id, entries = listing.entries.len(), "comparing tree");
        compare_tree(rule, &listing)
    }
}

impl Evaluator for StructureEvaluator<'_> {
    fn category(&self) -> Category {
        Category::Structure
    }

    fn evaluate(&self, spec: &RuleSpec) -> Vec<Verdict> {
        spec.structure
            .iter()
            .flat_map(|rule| self.check(rule))
            .collect()
    }
}

/// Case-sensitive, exact comparison of expected entries against a listing.
#[must_use]
pub fn compare_tree(rule: &StructureRule, listing: &TreeListing) -> Vec<Verdict> {
    let actual: HashMap<&str, EntryKind> = listing
        .entries
        .iter()
        .map(|e| (e.path.as_str(), e.kind))
        .collect();

    let mut verdicts = Vec::new();
    for entry in &rule.entries {
        let path = &entry.path;
        match actual.get(path.as_str()) {
            None => verdicts.push(
                Verdict::fail(
                    format!("{}:missing:{path}", rule.id),
                    Category::Structure,
                    format!("expected entry not found: {path}"),
                )
                .with_evidence(kind_label(entry.kind), "missing"),
            ),
            Some(&kind) if !accepts(entry.kind, kind) => verdicts.push(
                Verdict::fail(
                    format!("{}:type:{path}", rule.id),
                    Category::Structure,
                    format!("{path} is a {kind}, expected a {}", kind_label(entry.kind)),
                )
                .with_evidence(kind_label(entry.kind), kind.to_string()),
            ),
            Some(_) => {}
        }
    }

    if rule.mode == WorldMode::Closed {
        for extra in unexpected_entries(rule, listing) {
            verdicts.push(
                Verdict::fail(
                    format!("{}:unexpected:{}", rule.id, extra.path),
                    Category::Structure,
                    format!("unexpected entry: {}", extra.path),
                )
                .with_evidence("not present", extra.kind.to_string()),
            );
        }
    }

    if verdicts.is_empty() {
        let world = match rule.mode {
            WorldMode::Open => "open world",
            WorldMode::Closed => "closed world",
        };
        verdicts.push(Verdict::pass(
            &rule.id,
            Category::Structure,
            format!("all {} expected entries present ({world})", rule.entries.len()),
        ));
    }
    verdicts
}

/// Entries that are neither expected, allowed, nor a parent directory of one.
/// Only the topmost unexpected entry of an unexpected subtree is reported.
fn unexpected_entries<'l>(rule: &StructureRule, listing: &'l TreeListing) -> Vec<&'l TreeEntry> {
    let mut permitted: HashSet<&str> = rule.entries.iter().map(|e| e.path.as_str()).collect();
    permitted.extend(
        listing
            .entries
            .iter()
            .filter(|e| rule.allow.is_match(&e.path))
            .map(|e| e.path.as_str()),
    );

    let parents: Vec<&str> = permitted.iter().flat_map(|p| ancestors(*p)).collect();
    permitted.extend(parents);

    let mut flagged: Vec<&TreeEntry> = listing
        .entries
        .iter()
        .filter(|e| !permitted.contains(e.path.as_str()))
        .collect();
    flagged.sort_by(|a, b| a.path.cmp(&b.path));

    let flagged_paths: HashSet<&str> = flagged.iter().map(|&e| e.path.as_str()).collect();
    flagged.retain(|e| !ancestors(&e.path).any(|a| flagged_paths.contains(a)));
    flagged
}

/// `a/b/c` yields `a`, `a/b`.
fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('/').map(move |(i, _)| &path[..i])
}

const fn accepts(expected: ExpectedKind, actual: EntryKind) -> bool {
    match expected {
        ExpectedKind::Any => true,
        ExpectedKind::File => matches!(actual, EntryKind::File),
        ExpectedKind::Dir => matches!(actual, EntryKind::Dir),
    }
}

const fn kind_label(kind: ExpectedKind) -> &'static str {
    match kind {
        ExpectedKind::Any => "entry",
        ExpectedKind::File => "file",
        ExpectedKind::Dir => "dir",
    }
}

#[cfg(test)]
#[path = "structure_tests.rs"]
mod tests;
