//! Pipeline building and execution.
//!
//! This module provides:
//! - Stage definitions with declared temp-namespace inputs and outputs
//! - A pipeline builder that validates the stage chain
//! - The shared temp namespace and its cleanup
//! - The fail-fast orchestrator

mod builder;
mod orchestrator;
mod pattern;
mod result;
mod stage;
mod status;
mod temp;


pub use builder::{Pipeline, PipelineBuilder, TempSpec};
pub use orchestrator::Orchestrator;
pub use pattern::FilePattern;
pub use result::{RunReport, StageRecord};
pub use stage::{BuildFn, StageContext, ToolStage, VERBOSE};
pub use status::RunState;
pub use temp::TempNamespace;
