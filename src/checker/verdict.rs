use std::fmt;

use serde::Serialize;

/// Rule category. Evaluators run in the order of [`Category::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Env,
    Existence,
    Structure,
    Content,
    Commit,
}

impl Category {
    pub const ALL: [Self; 5] = [
        Self::Env,
        Self::Existence,
        Self::Structure,
        Self::Content,
        Self::Commit,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Env => "env",
            Self::Existence => "existence",
            Self::Structure => "structure",
            Self::Content => "content",
            Self::Commit => "commit",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one rule.
///
/// `Fail` means the rule ran and the data did not satisfy it. `Error` means the
/// rule could not be evaluated at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Error,
}

impl Outcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected vs actual, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evidence {
    pub expected: String,
    pub actual: String,
}

/// Result of evaluating one rule. Built once by its evaluator, never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub rule_id: String,
    pub category: Category,
    pub outcome: Outcome,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Evidence>,
}

impl Verdict {
    fn new(
        rule_id: impl Into<String>,
        category: Category,
        outcome: Outcome,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            category,
            outcome,
            detail: detail.into(),
            evidence: None,
        }
    }

    #[must_use]
    pub fn pass(rule_id: impl Into<String>, category: Category, detail: impl Into<String>) -> Self {
        Self::new(rule_id, category, Outcome::Pass, detail)
    }

    #[must_use]
    pub fn fail(rule_id: impl Into<String>, category: Category, detail: impl Into<String>) -> Self {
        Self::new(rule_id, category, Outcome::Fail, detail)
    }

    #[must_use]
    pub fn error(
        rule_id: impl Into<String>,
        category: Category,
        detail: impl Into<String>,
    ) -> Self {
        Self::new(rule_id, category, Outcome::Error, detail)
    }

    #[must_use]
    pub fn with_evidence(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.evidence = Some(Evidence {
            expected: expected.into(),
            actual: actual.into(),
        });
        self
    }

    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self.outcome, Outcome::Pass)
    }

    #[must_use]
    pub const fn is_fail(&self) -> bool {
        matches!(self.outcome, Outcome::Fail)
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error)
    }
}
