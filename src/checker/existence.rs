use rayon::prelude::*;
use tracing::debug;

use crate::config::{ExistenceRule, RuleSpec};
use crate::fetch::Fetcher;

use super::{Category, Evaluator, Verdict};

/// Confirms files exist (or are absent) at their expected paths.
///
/// One fetch per rule; fetches run in parallel, verdicts keep rule order.
pub struct ExistenceEvaluator<'a> {
    fetcher: &'a dyn Fetcher,
}

impl<'a> ExistenceEvaluator<'a> {
    #[must_use]
    pub const fn new(fetcher: &'a dyn Fetcher) -> Self {
        Self { fetcher }
    }

    fn check(&self, rule: &ExistenceRule) -> Verdict {
        let path = &rule.path;
        let fetched = match self.fetcher.get_file_content(path, rule.git_ref.as_deref()) {
            Ok(content) => content,
            Err(e) => {
                debug!(rule = %rule.id, error = %e, "existence fetch failed");
                return Verdict::error(
                    &rule.id,
                    Category::Existence,
                    format!("could not check {path}: {e}"),
                );
            }
        };

        match (rule.expected, fetched.exists()) {
            (true, true) => Verdict::pass(
                &rule.id,
                Category::Existence,
                format!("file present: {path}"),
            ),
            (false, false) => Verdict::pass(
                &rule.id,
                Category::Existence,
                format!("file absent as expected: {path}"),
            ),
            (true, false) => Verdict::fail(
                &rule.id,
                Category::Existence,
                format!("expected file not found: {path}"),
            )
            .with_evidence("present", "missing"),
            (false, true) => Verdict::fail(
                &rule.id,
                Category::Existence,
                format!("unexpected file present: {path}"),
            )
            .with_evidence("absent", "present"),
        }
    }
}

impl Evaluator for ExistenceEvaluator<'_> {
    fn category(&self) -> Category {
        Category::Existence
    }

    fn evaluate(&self, spec: &RuleSpec) -> Vec<Verdict> {
        spec.existence
            .par_iter()
            .map(|rule| self.check(rule))
            .collect()
    }
}

#[cfg(test)]
#[path = "existence_tests.rs"]
mod tests;
