use crate::config::{EnvRule, Environment, RuleSpec};

use super::{Category, Evaluator, Verdict};

/// Checks required environment variables.
pub struct EnvEvaluator<'a> {
    env: &'a dyn Environment,
}

impl<'a> EnvEvaluator<'a> {
    #[must_use]
    pub const fn new(env: &'a dyn Environment) -> Self {
        Self { env }
    }

    fn check(&self, rule: &EnvRule) -> Verdict {
        let value = self.env.var(&rule.var).filter(|v| !v.is_empty());
        let Some(value) = value else {
            return Verdict::fail(
                &rule.id,
                Category::Env,
                format!("environment variable not set: {}", rule.var),
            )
            .with_evidence("set", "unset");
        };

        match &rule.pattern {
            // The value is never echoed back: it may be a secret.
            Some(pattern) if !pattern.is_match(&value) => Verdict::fail(
                &rule.id,
                Category::Env,
                format!(
                    "environment variable {} does not match /{}/",
                    rule.var,
                    pattern.as_str()
                ),
            ),
            _ => Verdict::pass(
                &rule.id,
                Category::Env,
                format!("environment variable set: {}", rule.var),
            ),
        }
    }
}

impl Evaluator for EnvEvaluator<'_> {
    fn category(&self) -> Category {
        Category::Env
    }

    fn evaluate(&self, spec: &RuleSpec) -> Vec<Verdict> {
        spec.env.iter().map(|rule| self.check(rule)).collect()
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
