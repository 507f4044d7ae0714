//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Inspect prints its report on stdout, so its logs go to stderr
    let logs_to_stderr = matches!(cli.command, Some(Commands::Inspect(_)));
    init_logging(cli.verbose, logs_to_stderr);

    // `config set` may create the file named by --config
    let config = match (&cli.command, cli.config.as_deref()) {
        (Some(Commands::Config(_)), Some(path)) if !path.exists() => Config::default(),
        (_, explicit) => Config::load(explicit)?,
    };

    let ctx = commands::Context {
        config,
        config_path: cli.config,
        verbose: cli.verbose,
    };

    // Dispatch to appropriate command
    match cli.command {
        None => commands::collect::execute(ctx, cli.collect).await,
        Some(Commands::Collect(args)) => commands::collect::execute(ctx, args).await,
        Some(Commands::Inspect(args)) => commands::inspect::execute(ctx, args).await,
        Some(Commands::Config(args)) => commands::config::execute(ctx, args).await,
    }
}

/// Install the fmt subscriber.
///
/// `--verbose` forces debug; otherwise `RUST_LOG` applies, defaulting to info.
fn init_logging(verbose: bool, to_stderr: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = if to_stderr {
        builder.with_writer(std::io::stderr).try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = installed {
        eprintln!("logging already initialized: {e}");
    }
}
