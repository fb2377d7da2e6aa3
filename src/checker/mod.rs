mod aggregate;
mod commit;
mod content;
mod env;
mod existence;
mod runner;
mod structure;
mod verdict;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use aggregate::{OverallOutcome, Summary, VerificationResult};
pub use commit::CommitEvaluator;
pub use content::ContentEvaluator;
pub use env::EnvEvaluator;
pub use existence::ExistenceEvaluator;
pub use runner::Verifier;
pub use structure::StructureEvaluator;
pub use verdict::{Category, Evidence, Outcome, Verdict};

use crate::config::RuleSpec;

/// Evaluates one rule category.
///
/// An evaluator never fails as a whole: problems fetching or decoding data
/// become [`Outcome::Error`] verdicts for the affected rules only.
pub trait Evaluator {
    fn category(&self) -> Category;

    /// Verdicts for this evaluator's rules, in declaration order.
    fn evaluate(&self, spec: &RuleSpec) -> Vec<Verdict>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
