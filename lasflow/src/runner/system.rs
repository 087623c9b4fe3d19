//! Runner backed by real child processes.

use super::{ProcessRunner, RunResult};
use crate::command::CommandLine;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::io;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::debug;

/// Runs commands as child processes of the current process.
///
/// Standard output and standard error are read concurrently and merged in
/// the order their chunks arrive, so warnings keep their place in the log.
/// There is no timeout: a child that never exits blocks the run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    /// Creates a new system runner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(&self, command: &CommandLine) -> io::Result<RunResult> {
        debug!(program = %command.program().display(), args = ?command.argv(), "Spawning process");

        let mut child = Command::new(command.program())
            .args(command.argv())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let merged = Mutex::new(Vec::new());
        let (stdout, stderr) = tokio::join!(
            drain(child.stdout.take(), &merged),
            drain(child.stderr.take(), &merged),
        );
        stdout?;
        stderr?;
        let status = child.wait().await?;

        let exit_code = status.code().unwrap_or(-1);
        debug!(exit_code, "Process exited");

        let text = String::from_utf8_lossy(&merged.into_inner()).into_owned();
        Ok(RunResult::new(exit_code, text))
    }
}

/// Appends everything `reader` yields to `merged`, one chunk at a time.
async fn drain<R: AsyncRead + Unpin>(reader: Option<R>, merged: &Mutex<Vec<u8>>) -> io::Result<()> {
    let Some(mut reader) = reader else {
        return Ok(());
    };
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        merged.lock().extend_from_slice(&chunk[..n]);
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_runs_and_captures_output() {
        let mut cmd = CommandLine::new("/bin/sh");
        cmd.arg("-c").arg("echo out; echo err 1>&2; exit 3");

        let result = SystemProcessRunner::new().run(&cmd).await.unwrap();

        assert_eq!(result.exit_code, 3);
        assert!(result.output.contains("out"));
        assert!(result.output.contains("err"));
    }

    #[tokio::test]
    async fn test_stderr_keeps_its_place_in_the_output() {
        let mut cmd = CommandLine::new("/bin/sh");
        cmd.arg("-c")
            .arg("echo first; sleep 0.2; echo warning 1>&2; sleep 0.2; echo last");

        let result = SystemProcessRunner::new().run(&cmd).await.unwrap();

        assert!(result.is_success());
        assert_eq!(result.output, "first\nwarning\nlast\n");
    }

    #[tokio::test]
    async fn test_quoted_args_reach_child_unquoted() {
        let mut cmd = CommandLine::new("/bin/sh");
        cmd.arg("-c").arg("printf '%s' \"$0\"").quoted("with space");

        let result = SystemProcessRunner::new().run(&cmd).await.unwrap();

        assert!(result.is_success());
        assert_eq!(result.output, "with space");
    }

    #[tokio::test]
    async fn test_missing_program_is_io_error() {
        let cmd = CommandLine::new("/nonexistent/lasflow-test-binary");
        assert!(SystemProcessRunner::new().run(&cmd).await.is_err());
    }
}
