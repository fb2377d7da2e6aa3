//! Fatal error output on stderr.
//!
//! Format: `✖ {type}: {message}` / `  × {detail}` / `  help: {suggestion}`

use std::io::{IsTerminal, Write};

use crate::error::RepoGuardError;

use super::{ColorMode, ansi, no_color_requested};

pub struct ErrorOutput {
    use_colors: bool,
}

impl ErrorOutput {
    #[must_use]
    pub fn new(mode: ColorMode) -> Self {
        let use_colors = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => !no_color_requested() && std::io::stderr().is_terminal(),
        };
        Self { use_colors }
    }

    /// Prints a fatal error to stderr.
    pub fn print_fatal(&self, error: &RepoGuardError) {
        let mut stderr = std::io::stderr().lock();
        self.write_fatal(&mut stderr, error);
    }

    pub fn write_fatal<W: Write>(&self, w: &mut W, error: &RepoGuardError) {
        self.write_error(
            w,
            error.error_type(),
            &error.to_string(),
            error.detail().as_deref(),
            error.suggestion(),
        );
    }

    /// Writes error to a writer (for testing).
    pub fn write_error<W: Write>(
        &self,
        w: &mut W,
        error_type: &str,
        message: &str,
        detail: Option<&str>,
        suggestion: Option<&str>,
    ) {
        // Nothing useful can be done if stderr itself is gone.
        if self.use_colors {
            let _ = writeln!(
                w,
                "{}{}✖ {error_type}:{} {message}",
                ansi::BOLD,
                ansi::RED,
                ansi::RESET
            );
        } else {
            let _ = writeln!(w, "✖ {error_type}: {message}");
        }

        if let Some(d) = detail {
            if self.use_colors {
                let _ = writeln!(w, "  {}× {d}{}", ansi::DIM, ansi::RESET);
            } else {
                let _ = writeln!(w, "  × {d}");
            }
        }

        if let Some(s) = suggestion {
            if self.use_colors {
                let _ = writeln!(w, "  {}help:{} {s}", ansi::CYAN, ansi::RESET);
            } else {
                let _ = writeln!(w, "  help: {s}");
            }
        }
    }

    #[cfg(test)]
    pub const fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }
}

/// Convenience function: prints a fatal error with the given color mode.
pub fn print_fatal(error: &RepoGuardError, mode: ColorMode) {
    ErrorOutput::new(mode).print_fatal(error);
}

#[cfg(test)]
#[path = "error_output_tests.rs"]
mod tests;
