use std::fs;
use std::path::Path;

use chrono::Utc;
use tracing::info;

use crate::checker::{OverallOutcome, Verifier, VerificationResult};
use crate::cli::{CheckArgs, Cli};
use crate::config::{
    Credentials, DEFAULT_ENV_FILE, ProcessEnvironment, RuleLoader, RuleSpec, Target, load_env_file,
};
use crate::fetch::{FetchError, Fetcher, GitHubFetcher, HttpClient, RepoLocator, ReqwestClient};
use crate::output::{JsonFormatter, OutputFormat, OutputFormatter, TextFormatter, print_fatal};
use crate::{EXIT_CONFIG_ERROR, EXIT_SUCCESS, EXIT_VERIFICATION_FAILED, RepoGuardError, Result};

#[must_use]
pub fn run_check(args: &CheckArgs, cli: &Cli) -> i32 {
    match run_check_impl(args, cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            print_fatal(&e, cli.color.into());
            EXIT_CONFIG_ERROR
        }
    }
}

pub(crate) fn run_check_impl(args: &CheckArgs, cli: &Cli) -> Result<i32> {
    // 1. Rules, with command-line overrides
    let mut spec = RuleLoader::new().load(args.rules.as_deref())?;
    apply_cli_overrides(&mut spec, args)?;

    // 2. Credentials: env file first, process environment wins
    let env_file = args
        .env_file
        .as_deref()
        .unwrap_or_else(|| Path::new(DEFAULT_ENV_FILE));
    load_env_file(env_file, args.env_file.is_some())?;
    let env = ProcessEnvironment;
    let credentials = Credentials::from_env(&env)?;

    // 3. Repository must resolve before any rule runs
    let locator = spec.target.locator(&credentials)?;
    let client = ReqwestClient::new().map_err(|source| RepoGuardError::RepoResolve {
        repo: locator.to_string(),
        source,
    })?;
    let fetcher = connect(client, &spec.target, locator, &credentials)?;

    // 4. Evaluate
    let result = run_with_jobs(args.jobs, || {
        Verifier::new(&fetcher, &env).with_now(Utc::now()).run(&spec)
    })?;

    // 5. Report
    let verbose = if cli.quiet { 0 } else { cli.verbose };
    let report = format_output(args.format, &result, cli, verbose)?;
    write_output(args.output.as_deref(), &report, cli.quiet)?;

    Ok(exit_code(&result))
}

/// Apply `--repo` and `--ref` on top of the rule file's target.
pub(crate) fn apply_cli_overrides(spec: &mut RuleSpec, args: &CheckArgs) -> Result<()> {
    if let Some(repo) = &args.repo {
        spec.target.set_repo(repo)?;
    }
    if let Some(git_ref) = &args.git_ref {
        let git_ref = git_ref.trim();
        if git_ref.is_empty() {
            return Err(RepoGuardError::Config("--ref must not be empty".to_string()));
        }
        spec.target.git_ref = Some(git_ref.to_string());
    }
    Ok(())
}

/// Build the fetcher and confirm the repository exists.
///
/// Calls without an explicit ref use `target.ref`, or the repository's
/// default branch when none is configured.
pub(crate) fn connect<C: HttpClient>(
    client: C,
    target: &Target,
    locator: RepoLocator,
    credentials: &Credentials,
) -> Result<GitHubFetcher<C>> {
    let repo = locator.to_string();
    let fetcher = GitHubFetcher::new(client, target.api_url.as_str(), locator, credentials);

    let info = fetcher.resolve_repository().map_err(|e| match e {
        FetchError::NotFound(_) => RepoGuardError::RepoNotFound(repo.clone()),
        source => RepoGuardError::RepoResolve {
            repo: repo.clone(),
            source,
        },
    })?;

    let git_ref = target
        .git_ref
        .clone()
        .unwrap_or_else(|| info.default_branch.clone());
    info!(repo = %info.full_name, git_ref = %git_ref, "repository resolved");
    Ok(fetcher.with_default_ref(git_ref))
}

/// Run `op` on a dedicated pool when `--jobs` is given, else on rayon's global pool.
pub(crate) fn run_with_jobs<R: Send>(
    jobs: Option<usize>,
    op: impl FnOnce() -> R + Send,
) -> Result<R> {
    let Some(jobs) = jobs else {
        return Ok(op());
    };
    if jobs == 0 {
        return Err(RepoGuardError::Config("--jobs must be at least 1".to_string()));
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| {
            RepoGuardError::Config(format!("Failed to start {jobs} worker threads: {e}"))
        })?;
    Ok(pool.install(op))
}

pub(crate) fn format_output(
    format: OutputFormat,
    result: &VerificationResult,
    cli: &Cli,
    verbose: u8,
) -> Result<String> {
    match format {
        OutputFormat::Text => TextFormatter::with_verbose(cli.color.into(), verbose).format(result),
        OutputFormat::Json => JsonFormatter.format(result),
    }
}

pub(crate) fn write_output(output_path: Option<&Path>, content: &str, quiet: bool) -> Result<()> {
    if let Some(path) = output_path {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        info!(path = %path.display(), "report written");
    } else if !quiet {
        print!("{content}");
    }
    Ok(())
}

#[must_use]
pub const fn exit_code(result: &VerificationResult) -> i32 {
    match result.overall {
        OverallOutcome::Pass => EXIT_SUCCESS,
        OverallOutcome::Fail => EXIT_VERIFICATION_FAILED,
    }
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
