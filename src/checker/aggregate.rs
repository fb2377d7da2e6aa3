use serde::Serialize;

use super::{Outcome, Verdict};

/// Binary outcome of a whole run. There is no partial credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallOutcome {
    Pass,
    Fail,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
}

/// Aggregated outcome of a run: every verdict in evaluation order plus the
/// overall decision derived from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub overall: OverallOutcome,
    pub summary: Summary,
    pub verdicts: Vec<Verdict>,
}

impl VerificationResult {
    /// Overall is `Pass` only if every verdict passed. An empty run passes.
    #[must_use]
    pub fn from_verdicts(verdicts: Vec<Verdict>) -> Self {
        let summary = verdicts.iter().fold(
            Summary {
                total: verdicts.len(),
                ..Summary::default()
            },
            |mut s, v| {
                match v.outcome {
                    Outcome::Pass => s.passed += 1,
                    Outcome::Fail => s.failed += 1,
                    Outcome::Error => s.errored += 1,
                }
                s
            },
        );
        let overall = if summary.passed == summary.total {
            OverallOutcome::Pass
        } else {
            OverallOutcome::Fail
        };

        Self {
            overall,
            summary,
            verdicts,
        }
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.overall == OverallOutcome::Pass
    }

    /// Failed and errored verdicts, in order.
    pub fn problems(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts.iter().filter(|v| !v.is_pass())
    }
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod tests;
