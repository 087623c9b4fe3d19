//! Stage definitions.

use super::{FilePattern, TempNamespace};
use crate::command::CommandLine;
use crate::errors::{LasflowError, SchemaError};
use crate::params::ParamRecord;
use std::fmt::{self, Debug};
use std::path::{Path, PathBuf};

/// Name of the boolean field every tool carries last.
pub const VERBOSE: &str = "verbose";

/// Builds the command line of one stage.
pub type BuildFn = fn(&StageContext<'_>) -> Result<CommandLine, LasflowError>;

/// Everything a stage needs to build its command line.
#[derive(Debug, Clone, Copy)]
pub struct StageContext<'a> {
    params: &'a ParamRecord,
    program: &'a Path,
    temp: Option<&'a TempNamespace>,
    input: Option<&'a FilePattern>,
}

impl<'a> StageContext<'a> {
    /// Creates a stage context.
    #[must_use]
    pub fn new(
        params: &'a ParamRecord,
        program: &'a Path,
        temp: Option<&'a TempNamespace>,
        input: Option<&'a FilePattern>,
    ) -> Self {
        Self {
            params,
            program,
            temp,
            input,
        }
    }

    /// The decoded tool parameters.
    #[must_use]
    pub fn params(&self) -> &'a ParamRecord {
        self.params
    }

    /// Starts the stage's command, with `-v` when the run is verbose.
    #[must_use]
    pub fn command(&self) -> CommandLine {
        let mut cmd = CommandLine::new(self.program);
        cmd.flag_if(self.params.flag(VERBOSE), "-v");
        cmd
    }

    /// The shared temp directory, if the pipeline has one.
    #[must_use]
    pub fn temp_dir(&self) -> Option<&'a Path> {
        self.temp.map(TempNamespace::dir)
    }

    /// The wildcard path of this stage's declared input.
    #[must_use]
    pub fn input_glob(&self) -> Option<PathBuf> {
        self.temp.zip(self.input).map(|(ns, pattern)| ns.glob(pattern))
    }

    /// Returns a required text parameter.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingValue`] if the parameter is unset.
    pub fn require_text(&self, field: &'static str) -> Result<&'a str, SchemaError> {
        self.params
            .text(field)
            .ok_or(SchemaError::MissingValue { field })
    }
}

/// One external-executable step of a pipeline.
#[derive(Clone)]
pub struct ToolStage {
    name: &'static str,
    program: &'static str,
    build: BuildFn,
    input: Option<FilePattern>,
    output: Option<FilePattern>,
}

impl ToolStage {
    /// Creates a stage that runs `program`.
    #[must_use]
    pub fn new(name: &'static str, program: &'static str, build: BuildFn) -> Self {
        Self {
            name,
            program,
            build,
            input: None,
            output: None,
        }
    }

    /// Declares the temp-namespace files this stage reads.
    #[must_use]
    pub fn reads(mut self, pattern: FilePattern) -> Self {
        self.input = Some(pattern);
        self
    }

    /// Declares the temp-namespace files this stage writes.
    #[must_use]
    pub fn writes(mut self, pattern: FilePattern) -> Self {
        self.output = Some(pattern);
        self
    }

    /// The stage name used in messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The executable name, without platform suffix.
    #[must_use]
    pub fn program(&self) -> &'static str {
        self.program
    }

    /// The declared input pattern.
    #[must_use]
    pub fn input(&self) -> Option<&FilePattern> {
        self.input.as_ref()
    }

    /// The declared output pattern.
    #[must_use]
    pub fn output(&self) -> Option<&FilePattern> {
        self.output.as_ref()
    }

    /// Builds the command line for this stage.
    ///
    /// # Errors
    ///
    /// Returns whatever the build function reports, typically a [`SchemaError`].
    pub fn build(
        &self,
        params: &ParamRecord,
        program: &Path,
        temp: Option<&TempNamespace>,
    ) -> Result<CommandLine, LasflowError> {
        let ctx = StageContext::new(params, program, temp, self.input.as_ref());
        (self.build)(&ctx)
    }
}

impl Debug for ToolStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolStage")
            .field("name", &self.name)
            .field("program", &self.program)
            .field("input", &self.input)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}
