pub mod checker;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fetch;
pub mod output;
pub mod telemetry;

pub use error::{RepoGuardError, Result};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_VERIFICATION_FAILED: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
