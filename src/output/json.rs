use serde::Serialize;

use crate::checker::{OverallOutcome, Summary, Verdict, VerificationResult};
use crate::error::Result;

use super::OutputFormatter;

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput<'a> {
    overall: OverallOutcome,
    passed: bool,
    summary: Summary,
    verdicts: &'a [Verdict],
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &VerificationResult) -> Result<String> {
        let output = JsonOutput {
            overall: result.overall,
            passed: result.passed(),
            summary: result.summary,
            verdicts: &result.verdicts,
        };

        Ok(serde_json::to_string_pretty(&output)?)
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
