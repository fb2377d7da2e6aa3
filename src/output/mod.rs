mod error_output;
mod json;
mod text;

pub use error_output::{ErrorOutput, print_fatal};
pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::checker::VerificationResult;
use crate::error::Result;

/// Color output mode for terminal display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Auto-detect: use colors if the stream is a TTY and `NO_COLOR` is not set
    #[default]
    Auto,
    Always,
    Never,
}

/// ANSI color codes
pub(crate) mod ansi {
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RESET: &str = "\x1b[0m";
}

/// Per <https://no-color.org>: presence of the variable (any value) disables color.
fn no_color_requested() -> bool {
    std::env::var_os("NO_COLOR").is_some()
}

/// Trait for rendering a verification result.
pub trait OutputFormatter {
    /// Format the result into a string.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    fn format(&self, result: &VerificationResult) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
