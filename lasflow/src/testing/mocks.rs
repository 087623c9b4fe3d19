//! Process-runner spies.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;

use crate::command::CommandLine;
use crate::runner::{ProcessRunner, RunResult};

/// The scripted response to one launch.
#[derive(Debug, Clone, Default)]
pub struct ScriptedCall {
    exit_code: i32,
    output: String,
    creates: Vec<PathBuf>,
    removes: Vec<PathBuf>,
    launch_error: Option<io::ErrorKind>,
}

impl ScriptedCall {
    /// A launch that exits with status 0.
    #[must_use]
    pub fn ok() -> Self {
        Self::default()
    }

    /// A launch that exits with the given status.
    #[must_use]
    pub fn exit(code: i32) -> Self {
        Self {
            exit_code: code,
            ..Self::default()
        }
    }

    /// A launch that cannot start the process at all.
    #[must_use]
    pub fn launch_error(kind: io::ErrorKind) -> Self {
        Self {
            launch_error: Some(kind),
            ..Self::default()
        }
    }

    /// Sets the captured output.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    /// Creates these (empty) files when the launch happens.
    #[must_use]
    pub fn creating(mut self, files: impl IntoIterator<Item = PathBuf>) -> Self {
        self.creates.extend(files);
        self
    }

    /// Removes these files or directories when the launch happens.
    #[must_use]
    pub fn removing(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.removes.extend(paths);
        self
    }
}

/// A runner that records every command instead of launching it.
///
/// Launches beyond the scripted ones succeed with no output.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    script: Mutex<VecDeque<ScriptedCall>>,
    calls: Mutex<Vec<CommandLine>>,
}

impl RecordingRunner {
    /// Creates a runner where every launch succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the response for the next unscripted launch.
    #[must_use]
    pub fn then(self, call: ScriptedCall) -> Self {
        self.script.lock().push_back(call);
        self
    }

    /// Returns the recorded commands.
    #[must_use]
    pub fn calls(&self) -> Vec<CommandLine> {
        self.calls.lock().clone()
    }

    /// Returns the number of launches.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns the launched program names, without directory or extension.
    #[must_use]
    pub fn programs(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .map(|cmd| {
                cmd.program()
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Returns the argument vectors of every launch.
    #[must_use]
    pub fn argvs(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .iter()
            .map(|cmd| cmd.argv().into_iter().map(str::to_string).collect())
            .collect()
    }
}

#[async_trait]
impl ProcessRunner for RecordingRunner {
    async fn run(&self, command: &CommandLine) -> io::Result<RunResult> {
        self.calls.lock().push(command.clone());
        let call = self.script.lock().pop_front().unwrap_or_default();

        if let Some(kind) = call.launch_error {
            return Err(io::Error::new(kind, format!("cannot start {}", command.program().display())));
        }
        for file in &call.creates {
            std::fs::write(file, b"")?;
        }
        for path in &call.removes {
            if path.is_dir() {
                std::fs::remove_dir_all(path)?;
            } else {
                std::fs::remove_file(path)?;
            }
        }

        Ok(RunResult::new(call.exit_code, call.output))
    }
}
