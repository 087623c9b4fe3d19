//! # Lasflow
//!
//! Command construction and stage orchestration over an installed LAStools
//! distribution.
//!
//! A host hands over an ordered list of string arguments. Lasflow decodes
//! them against the tool's positional schema, checks the installation,
//! builds the external command lines and runs them one at a time:
//!
//! - **Schemas**: positional fields with the `#` unset sentinel decoded once
//! - **Command lines**: a quoted display string and an unquoted argv built together
//! - **Pipelines**: stages chained through a shared temp namespace, validated when built
//! - **Orchestration**: fail-fast sequential execution with cleanup after success
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lasflow::prelude::*;
//!
//! let pipeline = lasflow::tools::pipeline("lasinfo")?;
//! let runner = SystemProcessRunner::new();
//! let reporter = ConsoleReporter::new();
//!
//! let report = Orchestrator::new("/opt/lastools", &runner, &reporter)
//!     .run(&pipeline, &host_args)
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cli;
pub mod command;
pub mod config;
pub mod errors;
pub mod install;
pub mod observability;
pub mod params;
pub mod pipeline;
pub mod reporter;
pub mod runner;
pub mod testing;
pub mod tools;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::command::{CommandArg, CommandLine};
    pub use crate::config::{LasflowConfig, LogFormat};
    pub use crate::errors::{
        ConfigError, ErrorClass, ExecutionError, LasflowError, SchemaError,
    };
    pub use crate::install::LasToolsInstall;
    pub use crate::params::{ParamRecord, ParamSchema, UNSET};
    pub use crate::pipeline::{
        FilePattern, Orchestrator, Pipeline, PipelineBuilder, RunReport,
        RunState, StageContext, ToolStage,
    };
    pub use crate::reporter::{
        CollectingReporter, ConsoleReporter, NoOpReporter, Reporter,
        TracingReporter,
    };
    pub use crate::runner::{ProcessRunner, RunResult, SystemProcessRunner};
}
