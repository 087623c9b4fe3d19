//! Error types for lasflow.
//!
//! Every detected problem aborts the run. Errors are grouped into three
//! classes (configuration, schema, execution) that are all handled the same
//! way: a specific message is reported and the process exits non-zero.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for lasflow operations.
#[derive(Debug, Error)]
pub enum LasflowError {
    /// The installation, the temp namespace, or the argument vector is unusable.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// A parameter value does not fit its schema field.
    #[error("{0}")]
    Schema(#[from] SchemaError),

    /// An external stage failed.
    #[error("{0}")]
    Execution(#[from] ExecutionError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad class of a [`LasflowError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Malformed installation, missing executable, bad temp dir, wrong argument count.
    Config,
    /// Categorical or numeric value outside its schema.
    Schema,
    /// A stage could not run or returned non-zero.
    Execution,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config => write!(f, "config"),
            Self::Schema => write!(f, "schema"),
            Self::Execution => write!(f, "execution"),
        }
    }
}

impl LasflowError {
    /// Returns the class of the error.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Config(_) => ErrorClass::Config,
            Self::Schema(_) => ErrorClass::Schema,
            Self::Execution(_) | Self::Io(_) => ErrorClass::Execution,
        }
    }

    /// Returns a stable code for the error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(err) => err.code(),
            Self::Schema(err) => err.code(),
            Self::Execution(err) => err.code(),
            Self::Io(_) => "EXEC-IO",
        }
    }

    /// Returns the name of the stage the error is attributed to, if any.
    #[must_use]
    pub fn stage(&self) -> Option<&str> {
        match self {
            Self::Execution(err) => Some(err.stage()),
            _ => None,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("class".to_string(), serde_json::json!(self.class()));
        map.insert("code".to_string(), serde_json::json!(self.code()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        if let Some(stage) = self.stage() {
            map.insert("stage".to_string(), serde_json::json!(stage));
        }
        map
    }
}

/// Configuration errors detected before any stage runs.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The argument vector does not match the tool's schema.
    #[error("Wrong number of arguments. Got {got} expected {expected}")]
    ArgumentCount {
        /// Number of arguments received.
        got: usize,
        /// Number of arguments the schema declares.
        expected: usize,
    },

    /// The installation root contains a character that breaks naive shell quoting.
    #[error("Path to lastools installation contains {what}: {path}")]
    UnsafeInstallPath {
        /// The offending installation root.
        path: PathBuf,
        /// Human readable name of the offending characters.
        what: &'static str,
    },

    /// The `bin` directory of the installation does not exist.
    #[error("Cannot find lastools bin directory at {}", path.display())]
    MissingBinDir {
        /// The expected `bin` directory.
        path: PathBuf,
    },

    /// An external executable does not exist.
    #[error("Cannot find {name} at {}", path.display())]
    MissingExecutable {
        /// The executable name.
        name: String,
        /// The path that was checked.
        path: PathBuf,
    },

    /// The shared temp namespace does not exist.
    #[error("Cannot find empty temp dir {}", path.display())]
    MissingTempDir {
        /// The temp directory.
        path: PathBuf,
    },

    /// The shared temp namespace is not empty.
    #[error("Empty temp directory '{}' is not empty", path.display())]
    TempDirNotEmpty {
        /// The temp directory.
        path: PathBuf,
    },

    /// A runtime setting has a value that cannot be used.
    #[error("Invalid value '{value}' for {name}")]
    InvalidSetting {
        /// Setting name.
        name: &'static str,
        /// Rejected value.
        value: String,
    },

    /// A pipeline definition is inconsistent.
    #[error("Invalid pipeline '{pipeline}': {message}")]
    InvalidPipeline {
        /// The pipeline name.
        pipeline: String,
        /// What is wrong with it.
        message: String,
    },
}

impl ConfigError {
    /// Creates an invalid pipeline error.
    #[must_use]
    pub fn invalid_pipeline(pipeline: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPipeline {
            pipeline: pipeline.into(),
            message: message.into(),
        }
    }

    /// Returns a stable code for the error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ArgumentCount { .. } => "CONFIG-ARGC",
            Self::UnsafeInstallPath { .. } => "CONFIG-INSTALL-PATH",
            Self::MissingBinDir { .. } => "CONFIG-BIN-DIR",
            Self::MissingExecutable { .. } => "CONFIG-EXECUTABLE",
            Self::MissingTempDir { .. } => "CONFIG-TEMP-MISSING",
            Self::TempDirNotEmpty { .. } => "CONFIG-TEMP-NOT-EMPTY",
            Self::InvalidSetting { .. } => "CONFIG-SETTING",
            Self::InvalidPipeline { .. } => "CONFIG-PIPELINE",
        }
    }
}

/// Errors raised while decoding parameters against a schema.
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    /// No tool is registered under the name.
    #[error("Unknown tool '{name}'")]
    UnknownTool {
        /// The requested tool name.
        name: String,
    },

    /// A required categorical field received a value outside its closed set.
    #[error("no {field} specified: '{value}' is not one of {}", allowed.join(", "))]
    UnknownChoice {
        /// The field name.
        field: &'static str,
        /// The rejected value.
        value: String,
        /// The accepted labels.
        allowed: Vec<&'static str>,
    },

    /// A value another field depends on was left unset.
    #[error("no {field} specified")]
    MissingValue {
        /// The field that should have been set.
        field: &'static str,
    },

    /// A numeric field could not be parsed.
    #[error("'{value}' is not a valid {expected} for {field}")]
    InvalidNumber {
        /// The field name.
        field: &'static str,
        /// The raw value after separator normalisation.
        value: String,
        /// What kind of number was expected.
        expected: &'static str,
    },
}

impl SchemaError {
    /// Creates an unknown tool error.
    #[must_use]
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool { name: name.into() }
    }

    /// Returns a stable code for the error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownTool { .. } => "SCHEMA-TOOL",
            Self::UnknownChoice { .. } => "SCHEMA-CHOICE",
            Self::MissingValue { .. } => "SCHEMA-MISSING",
            Self::InvalidNumber { .. } => "SCHEMA-NUMBER",
        }
    }
}

/// Errors raised while running stages.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The external process exited with a non-zero status.
    #[error("{tool} failed in {stage} step (exit code {exit_code})")]
    StageFailed {
        /// The tool being run.
        tool: String,
        /// The failing stage.
        stage: String,
        /// The exit code reported by the child.
        exit_code: i32,
    },

    /// The external process could not be started.
    #[error("{tool} could not launch {stage} step: {source}")]
    Launch {
        /// The tool being run.
        tool: String,
        /// The stage that could not be launched.
        stage: String,
        /// The underlying launch error.
        #[source]
        source: std::io::Error,
    },

    /// A stage found no input files in the shared temp namespace.
    #[error("{tool} found no input for {stage} step matching '{pattern}'")]
    EmptyInput {
        /// The tool being run.
        tool: String,
        /// The stage with no input.
        stage: String,
        /// The input pattern that matched nothing.
        pattern: String,
    },

    /// Removing temporary files failed.
    #[error("{tool} failed in clean-up step: {source}")]
    Cleanup {
        /// The tool being run.
        tool: String,
        /// The underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
}

impl ExecutionError {
    /// Returns the stage the error is attributed to.
    #[must_use]
    pub fn stage(&self) -> &str {
        match self {
            Self::StageFailed { stage, .. }
            | Self::Launch { stage, .. }
            | Self::EmptyInput { stage, .. } => stage,
            Self::Cleanup { .. } => "clean-up",
        }
    }

    /// Returns a stable code for the error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::StageFailed { .. } => "EXEC-STAGE",
            Self::Launch { .. } => "EXEC-LAUNCH",
            Self::EmptyInput { .. } => "EXEC-EMPTY-INPUT",
            Self::Cleanup { .. } => "EXEC-CLEANUP",
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = LasflowError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_count_message() {
        let err = LasflowError::from(ConfigError::ArgumentCount { got: 3, expected: 12 });
        assert_eq!(err.to_string(), "Wrong number of arguments. Got 3 expected 12");
        assert_eq!(err.class(), ErrorClass::Config);
        assert_eq!(err.code(), "CONFIG-ARGC");
    }

    #[test]
    fn test_stage_failed_names_stage() {
        let err = LasflowError::from(ExecutionError::StageFailed {
            tool: "huge_file_normalize".to_string(),
            stage: "lasground".to_string(),
            exit_code: 1,
        });

        assert_eq!(err.stage(), Some("lasground"));
        assert!(err.to_string().contains("failed in lasground step"));
        assert_eq!(err.class(), ErrorClass::Execution);
    }

    #[test]
    fn test_unknown_choice_lists_allowed() {
        let err = SchemaError::UnknownChoice {
            field: "target projection",
            value: "Mercator".to_string(),
            allowed: vec!["UTM", "Longitude Latitude"],
        };

        assert!(err.to_string().contains("UTM, Longitude Latitude"));
        assert_eq!(err.code(), "SCHEMA-CHOICE");
    }

    #[test]
    fn test_error_to_dict() {
        let err = LasflowError::from(SchemaError::unknown_tool("lasfoo"));
        let dict = err.to_dict();

        assert_eq!(dict.get("class").unwrap(), "schema");
        assert_eq!(dict.get("code").unwrap(), "SCHEMA-TOOL");
        assert!(dict.get("stage").is_none());
    }
}
