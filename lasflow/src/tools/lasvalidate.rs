//! `lasvalidate`: check files against the LAS specification.

use super::{ADDITIONAL, INPUT, OUTPUT_FILE};
use crate::command::CommandLine;
use crate::errors::{ConfigError, LasflowError};
use crate::params::{FieldSpec, ParamSchema};
use crate::pipeline::{Pipeline, PipelineBuilder, StageContext, ToolStage, VERBOSE};

/// Positional arguments of `lasvalidate`.
pub const SCHEMA: ParamSchema = ParamSchema::new(
    "lasvalidate",
    &[
        FieldSpec::text(INPUT),
        FieldSpec::flag("xml_output"),
        FieldSpec::text(OUTPUT_FILE),
        FieldSpec::extra(ADDITIONAL),
        FieldSpec::flag(VERBOSE),
    ],
);

pub(crate) fn pipeline() -> Result<Pipeline, ConfigError> {
    PipelineBuilder::new(SCHEMA)
        .stage(ToolStage::new("lasvalidate", "lasvalidate", build))
        .build()
}

fn build(ctx: &StageContext<'_>) -> Result<CommandLine, LasflowError> {
    let params = ctx.params();
    let mut cmd = ctx.command();
    cmd.arg("-i").quoted(ctx.require_text(INPUT)?);

    if params.flag("xml_output") {
        cmd.arg("-oxml");
    } else {
        cmd.option_quoted("-o", params.text(OUTPUT_FILE));
    }
    cmd.extra(params.extra(ADDITIONAL));

    Ok(cmd)
}
