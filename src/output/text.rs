use std::fmt::Write;

use crate::checker::{Outcome, OverallOutcome, Verdict, VerificationResult};
use crate::error::Result;

use super::{ColorMode, OutputFormatter, ansi, no_color_requested};

/// Human-readable report.
///
/// Failed and errored verdicts are always listed; passed verdicts only when
/// verbose. A summary line always ends the report.
pub struct TextFormatter {
    use_colors: bool,
    verbose: u8,
}

impl TextFormatter {
    #[must_use]
    pub fn new(mode: ColorMode) -> Self {
        Self::with_verbose(mode, 0)
    }

    #[must_use]
    pub fn with_verbose(mode: ColorMode, verbose: u8) -> Self {
        Self {
            use_colors: Self::should_use_colors(mode),
            verbose,
        }
    }

    fn should_use_colors(mode: ColorMode) -> bool {
        match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                !no_color_requested() && std::io::IsTerminal::is_terminal(&std::io::stdout())
            }
        }
    }

    const fn status_icon(outcome: Outcome) -> &'static str {
        match outcome {
            Outcome::Pass => "✓",
            Outcome::Fail => "✗",
            Outcome::Error => "⚠",
        }
    }

    const fn outcome_color(outcome: Outcome) -> &'static str {
        match outcome {
            Outcome::Pass => ansi::GREEN,
            Outcome::Fail => ansi::RED,
            Outcome::Error => ansi::YELLOW,
        }
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }
        format!("{color}{text}{}", ansi::RESET)
    }

    fn format_verdict(&self, verdict: &Verdict, output: &mut String) {
        let icon = Self::status_icon(verdict.outcome);
        let status = self.colorize(
            &verdict.outcome.as_str().to_uppercase(),
            Self::outcome_color(verdict.outcome),
        );
        let _ = writeln!(
            output,
            "{icon} {status} [{}] {}",
            verdict.category, verdict.rule_id
        );
        let _ = writeln!(output, "   {}", verdict.detail);

        if let Some(evidence) = &verdict.evidence {
            let _ = writeln!(output, "   expected: {}", indent_continuation(&evidence.expected));
            let _ = writeln!(output, "   actual:   {}", indent_continuation(&evidence.actual));
        }
    }

    fn format_summary(&self, result: &VerificationResult) -> String {
        let summary = &result.summary;
        let passed = self.colorize(&summary.passed.to_string(), ansi::GREEN);
        let failed = self.colorize(&summary.failed.to_string(), ansi::RED);
        let errored = self.colorize(&summary.errored.to_string(), ansi::YELLOW);
        let overall = match result.overall {
            OverallOutcome::Pass => self.colorize("PASS", ansi::GREEN),
            OverallOutcome::Fail => self.colorize("FAIL", ansi::RED),
        };

        format!(
            "Summary: {} rules checked, {passed} passed, {failed} failed, {errored} errored. Overall: {overall}",
            summary.total
        )
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new(ColorMode::Auto)
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &VerificationResult) -> Result<String> {
        let mut output = String::new();

        for verdict in result.problems() {
            self.format_verdict(verdict, &mut output);
            output.push('\n');
        }

        if self.verbose >= 1 {
            for verdict in result.verdicts.iter().filter(|v| v.is_pass()) {
                self.format_verdict(verdict, &mut output);
                output.push('\n');
            }
        }

        let _ = writeln!(output, "{}", self.format_summary(result));
        Ok(output)
    }
}

/// Align continuation lines of multi-line evidence under the first line.
fn indent_continuation(text: &str) -> String {
    text.replace('\n', "\n             ")
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
