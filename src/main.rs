use std::process::ExitCode;

use clap::Parser;
use samline_harness::cli;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("samline_harness=debug,info")
    } else {
        EnvFilter::new("samline_harness=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Run(args) => cli::run::run(args, cli.verbose),
        cli::Commands::Emit(args) => {
            cli::emit::run(args, cli.verbose)?;
            Ok(ExitCode::SUCCESS)
        }
        cli::Commands::List(args) => {
            cli::list::run(&args, cli.verbose)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
