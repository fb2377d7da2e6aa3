use std::path::PathBuf;

use clap::Parser;

use super::*;

#[test]
fn check_defaults() {
    let cli = Cli::parse_from(["repo-guard", "check"]);
    match cli.command {
        Commands::Check(args) => {
            assert_eq!(args.rules, None);
            assert_eq!(args.env_file, None);
            assert_eq!(args.format, OutputFormat::Text);
            assert_eq!(args.jobs, None);
        }
        _ => panic!("Expected Check command"),
    }
    assert_eq!(cli.verbose, 0);
    assert_eq!(cli.color, ColorChoice::Auto);
}

#[test]
fn check_with_all_options() {
    let cli = Cli::parse_from([
        "repo-guard",
        "check",
        "--rules",
        "ci/rules.toml",
        "--env-file",
        "secrets.env",
        "--repo",
        "octo/demo",
        "--ref",
        "release",
        "--format",
        "json",
        "--output",
        "report.json",
        "--jobs",
        "4",
    ]);
    match cli.command {
        Commands::Check(args) => {
            assert_eq!(args.rules, Some(PathBuf::from("ci/rules.toml")));
            assert_eq!(args.env_file, Some(PathBuf::from("secrets.env")));
            assert_eq!(args.repo.as_deref(), Some("octo/demo"));
            assert_eq!(args.git_ref.as_deref(), Some("release"));
            assert_eq!(args.format, OutputFormat::Json);
            assert_eq!(args.output, Some(PathBuf::from("report.json")));
            assert_eq!(args.jobs, Some(4));
        }
        _ => panic!("Expected Check command"),
    }
}

#[test]
fn invalid_format_is_rejected() {
    assert!(Cli::try_parse_from(["repo-guard", "check", "--format", "xml"]).is_err());
}

#[test]
fn global_flags_after_subcommand() {
    let cli = Cli::parse_from(["repo-guard", "check", "-vv", "--color", "never"]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.color, ColorChoice::Never);
    assert_eq!(ColorMode::from(cli.color), ColorMode::Never);
}

#[test]
fn init_defaults() {
    let cli = Cli::parse_from(["repo-guard", "init"]);
    match cli.command {
        Commands::Init(args) => {
            assert_eq!(args.output, PathBuf::from("repo-guard.toml"));
            assert!(!args.force);
        }
        _ => panic!("Expected Init command"),
    }
}

#[test]
fn config_validate_with_path() {
    let cli = Cli::parse_from(["repo-guard", "config", "validate", "--rules", "x.toml"]);
    match cli.command {
        Commands::Config(ConfigArgs {
            action: ConfigAction::Validate { rules },
        }) => assert_eq!(rules, PathBuf::from("x.toml")),
        _ => panic!("Expected Config command"),
    }
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["repo-guard"]).is_err());
}
