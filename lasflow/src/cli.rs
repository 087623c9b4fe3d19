//! Command-line surface of the `lasflow` binary.
//!
//! Flags override the environment; the environment overrides the defaults.
//! [`run_tool`] maps a run onto the process exit status.

use crate::config::{LasflowConfig, LogFormat};
use crate::errors::ConfigError;
use crate::pipeline::Orchestrator;
use crate::reporter::Reporter;
use crate::runner::ProcessRunner;
use crate::tools;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Exit status of a run that completed every stage.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit status of any abort.
pub const EXIT_FAILURE: u8 = 1;

/// Parsed command line.
#[derive(Debug, Parser)]
#[command(name = "lasflow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// LAStools installation root [env: LASTOOLS_HOME] (defaults to two levels above this binary)
    #[arg(long)]
    pub lastools: Option<PathBuf>,

    /// Log filter directive, written to stderr [env: LASFLOW_LOG]
    #[arg(long)]
    pub log: Option<String>,

    /// Log format [env: LASFLOW_LOG_FORMAT]
    #[arg(long, value_enum, ignore_case = true)]
    pub log_format: Option<LogFormat>,

    /// Validate and print the command lines without running anything
    #[arg(long)]
    pub dry_run: bool,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every tool with its positional arguments as JSON
    Tools,

    /// Run a tool: `<tool> [ARGS]...` with the host's positional arguments
    #[command(external_subcommand)]
    Run(Vec<String>),
}

impl Cli {
    /// Settings from the process environment with the explicit flags on top.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] for an unknown log format.
    pub fn config(&self) -> Result<LasflowConfig, ConfigError> {
        self.config_from(|key: &str| std::env::var(key).ok())
    }

    /// Like [`Cli::config`], reading the environment through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] for an unknown log format.
    pub fn config_from(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<LasflowConfig, ConfigError> {
        let mut config = LasflowConfig::from_lookup(lookup)?;
        if let Some(root) = &self.lastools {
            config = config.with_install_root(root);
        }
        if let Some(filter) = &self.log {
            config = config.with_log_filter(filter);
        }
        if let Some(format) = self.log_format {
            config = config.with_log_format(format);
        }
        Ok(config)
    }
}

/// Runs (or, with `dry_run`, plans) the named tool and returns the exit status.
///
/// Every failure is reported through `reporter` before
/// [`EXIT_FAILURE`] is returned.
pub async fn run_tool(
    install_root: &Path,
    runner: &dyn ProcessRunner,
    reporter: &dyn Reporter,
    name: &str,
    args: &[String],
    dry_run: bool,
) -> u8 {
    let pipeline = match tools::pipeline(name) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            reporter.message(&format!("Error. {err}"));
            return EXIT_FAILURE;
        }
    };
    let orchestrator = Orchestrator::new(install_root, runner, reporter);

    if dry_run {
        return match orchestrator.plan(&pipeline, args) {
            Ok(commands) => {
                for command in &commands {
                    reporter.message(&command.display());
                }
                EXIT_SUCCESS
            }
            Err(err) => {
                reporter.message(&format!("Error. {err}"));
                EXIT_FAILURE
            }
        };
    }

    // Aborts have already been reported to the host by the orchestrator.
    match orchestrator.run(&pipeline, args).await {
        Ok(report) => {
            debug!(?report, "Run report");
            EXIT_SUCCESS
        }
        Err(err) => {
            debug!(error = ?err.to_dict(), "Run aborted");
            EXIT_FAILURE
        }
    }
}
