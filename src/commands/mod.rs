pub mod check;
pub mod config;
pub mod init;

pub use check::run_check;
pub use config::{format_rule_counts, run_config};
pub use init::{generate_rules_template, run_init, run_init_impl};
