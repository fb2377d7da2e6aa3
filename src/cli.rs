use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::output::{ColorMode, OutputFormat};

/// Color output control
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal capability
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorChoice> for ColorMode {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => Self::Auto,
            ColorChoice::Always => Self::Always,
            ColorChoice::Never => Self::Never,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "repo-guard")]
#[command(
    author,
    version,
    about = "Verify a GitHub repository against declarative compliance rules"
)]
#[command(long_about = "Checks environment variables, file existence, directory layout, \
    file content and recent commit history of a GitHub repository against a rule file.\n\n\
    Exit codes:\n  \
    0 - All rules passed\n  \
    1 - At least one rule failed or could not be evaluated\n  \
    2 - Configuration, credential or repository error")]
pub struct Cli {
    /// Increase output verbosity (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Control color output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify the repository against the rule file
    Check(CheckArgs),

    /// Generate a rule file template
    Init(InitArgs),

    /// Rule file utilities
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Path to the rule file (default: repo-guard.toml)
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Dotenv file with credentials (default: .mcp_env, skipped if absent)
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Repository to verify, overriding target.repo
    #[arg(long, value_name = "OWNER/NAME")]
    pub repo: Option<String>,

    /// Branch, tag or sha, overriding target.ref
    #[arg(long = "ref", value_name = "REF")]
    pub git_ref: Option<String>,

    /// Output format [possible values: text, json]
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of parallel requests (default: number of CPUs)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output path for the rule file
    #[arg(short, long, default_value = "repo-guard.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the rule file without contacting the API
    Validate {
        /// Path to the rule file
        #[arg(short, long, default_value = "repo-guard.toml")]
        rules: PathBuf,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
