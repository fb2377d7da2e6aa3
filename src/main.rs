use clap::Parser;

use repo_guard::cli::{Cli, Commands};
use repo_guard::commands::{run_check, run_config, run_init};
use repo_guard::telemetry::{init_tracing, level_for};

fn main() {
    let cli = Cli::parse();
    init_tracing(level_for(cli.verbose, cli.quiet));

    let exit_code = match &cli.command {
        Commands::Check(args) => run_check(args, &cli),
        Commands::Init(args) => run_init(args, cli.color.into()),
        Commands::Config(args) => run_config(args, cli.color.into()),
    };

    std::process::exit(exit_code);
}
