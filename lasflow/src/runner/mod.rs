//! Process runner abstraction.
//!
//! A runner executes one [`CommandLine`] to completion and hands back the
//! exit code and the captured text. A non-zero exit code is an ordinary
//! result; deciding what it means is up to the caller.

mod system;

pub use system::SystemProcessRunner;

use crate::command::CommandLine;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The outcome of one external process invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunResult {
    /// Exit code of the child. Children terminated by a signal report `-1`.
    pub exit_code: i32,
    /// Captured standard output and standard error, merged in arrival order.
    pub output: String,
}

impl RunResult {
    /// Creates a run result.
    #[must_use]
    pub fn new(exit_code: i32, output: impl Into<String>) -> Self {
        Self {
            exit_code,
            output: output.into(),
        }
    }

    /// A successful run with no output.
    #[must_use]
    pub fn success() -> Self {
        Self::new(0, "")
    }

    /// Returns true if the child exited with status 0.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Trait for anything that can execute a command line.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs the command and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the process could not be started or its
    /// output could not be collected.
    async fn run(&self, command: &CommandLine) -> std::io::Result<RunResult>;
}
