//! Command-line entry point for lasflow.
//!
//! Usage:
//!   lasflow [--lastools `<dir>`] [--log-format `<fmt>`] [--dry-run] `<tool>` [ARGS]...
//!   lasflow tools

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use lasflow::cli::{self, Cli, Command};
use lasflow::observability::init_tracing;
use lasflow::reporter::ConsoleReporter;
use lasflow::runner::SystemProcessRunner;
use lasflow::tools;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(status) => ExitCode::from(status),
        Err(err) => {
            eprintln!("lasflow: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<u8> {
    let config = cli.config()?;
    init_tracing(&config)?;
    debug!(?config, "Configuration loaded");

    match &cli.command {
        Command::Tools => {
            let catalog = tools::catalog()?;
            println!("{}", serde_json::to_string_pretty(&catalog)?);
            Ok(cli::EXIT_SUCCESS)
        }
        Command::Run(argv) => {
            let (name, args) = argv.split_first().context("no tool given")?;
            let root = config
                .resolve_install_root()
                .context("locating the LAStools installation")?;
            let runner = SystemProcessRunner::new();
            let reporter = ConsoleReporter::new();

            Ok(cli::run_tool(&root, &runner, &reporter, name, args, cli.dry_run).await)
        }
    }
}
