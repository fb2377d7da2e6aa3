use chrono::{DateTime, Utc};
use tracing::{debug, info_span};

use crate::config::{Environment, RuleSpec};
use crate::fetch::Fetcher;

use super::{
    CommitEvaluator, ContentEvaluator, EnvEvaluator, Evaluator, ExistenceEvaluator,
    StructureEvaluator, VerificationResult,
};

/// Runs every evaluator in fixed category order and aggregates the verdicts.
pub struct Verifier<'a> {
    fetcher: &'a dyn Fetcher,
    env: &'a dyn Environment,
    now: DateTime<Utc>,
}

impl<'a> Verifier<'a> {
    #[must_use]
    pub fn new(fetcher: &'a dyn Fetcher, env: &'a dyn Environment) -> Self {
        Self {
            fetcher,
            env,
            now: Utc::now(),
        }
    }

    /// Reference time for commit time windows.
    #[must_use]
    pub const fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    #[must_use]
    pub fn run(&self, spec: &RuleSpec) -> VerificationResult {
        let env = EnvEvaluator::new(self.env);
        let existence = ExistenceEvaluator::new(self.fetcher);
        let structure = StructureEvaluator::new(self.fetcher);
        let content = ContentEvaluator::new(self.fetcher);
        let commit = CommitEvaluator::new(self.fetcher, self.now);
        let evaluators: [&dyn Evaluator; 5] = [&env, &existence, &structure, &content, &commit];

        let mut verdicts = Vec::with_capacity(spec.rule_count());
        for evaluator in evaluators {
            let category = evaluator.category();
            let _span = info_span!("evaluate", %category).entered();
            let produced = evaluator.evaluate(spec);
            debug!(verdicts = produced.len(), "category done");
            verdicts.extend(produced);
        }

        VerificationResult::from_verdicts(verdicts)
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
