//! `lasclip`: clip a folder of files against polygons.

use super::{
    append_folder_inputs, append_output_paths, ADDITIONAL, CORES, INPUT_DIR, OUTPUT_APPENDIX, OUTPUT_DIR,
    OUTPUT_FILE, OUTPUT_FORMAT, WILDCARDS,
};
use crate::command::CommandLine;
use crate::errors::{ConfigError, LasflowError, SchemaError};
use crate::params::{Choice, ChoiceSet, FieldSpec, ParamSchema};
use crate::pipeline::{Pipeline, PipelineBuilder, StageContext, ToolStage, VERBOSE};

const CLIP_FORMATS: &[Choice] = &[
    Choice::new("las", &["-olas"]),
    Choice::new("laz", &["-olaz"]),
    Choice::new("bin", &["-obin"]),
    Choice::new("txt", &["-otxt"]),
    Choice::new("xyzi", &["-otxt", "-oparse", "xyzi"]),
    Choice::new("txyzi", &["-otxt", "-oparse", "txyzi"]),
];

/// Positional arguments of `lasclip`.
pub const SCHEMA: ParamSchema = ParamSchema::new(
    "lasclip",
    &[
        FieldSpec::text(INPUT_DIR),
        FieldSpec::text(WILDCARDS),
        FieldSpec::flag("merged"),
        FieldSpec::text("polygon"),
        FieldSpec::flag("interior"),
        FieldSpec::flag("classify"),
        FieldSpec::integer("classification"),
        FieldSpec::choice(OUTPUT_FORMAT, ChoiceSet::optional(CLIP_FORMATS)),
        FieldSpec::text(OUTPUT_FILE),
        FieldSpec::text(OUTPUT_DIR),
        FieldSpec::text(OUTPUT_APPENDIX),
        FieldSpec::integer(CORES),
        FieldSpec::extra(ADDITIONAL),
        FieldSpec::flag(VERBOSE),
    ],
);

pub(crate) fn pipeline() -> Result<Pipeline, ConfigError> {
    PipelineBuilder::new(SCHEMA)
        .stage(ToolStage::new("lasclip", "lasclip", build))
        .build()
}

fn build(ctx: &StageContext<'_>) -> Result<CommandLine, LasflowError> {
    let params = ctx.params();
    let mut cmd = ctx.command();
    append_folder_inputs(&mut cmd, ctx)?;

    cmd.flag_if(params.flag("merged"), "-merged")
        .arg("-poly")
        .quoted(ctx.require_text("polygon")?)
        .flag_if(params.flag("interior"), "-interior");

    if params.flag("classify") {
        let class = params
            .integer("classification")
            .ok_or(SchemaError::MissingValue { field: "classification" })?;
        cmd.arg("-classify").arg(class.to_string());
    }

    cmd.choice(params.choice(OUTPUT_FORMAT));
    append_output_paths(&mut cmd, params);
    cmd.option_integer("-cores", params.integer(CORES), Some(1))
        .extra(params.extra(ADDITIONAL));

    Ok(cmd)
}
