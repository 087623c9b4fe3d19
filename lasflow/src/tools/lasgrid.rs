//! `lasgrid`: raster LiDAR points onto a grid.

use super::{append_output_paths, ADDITIONAL, INPUT, OUTPUT_APPENDIX, OUTPUT_DIR, OUTPUT_FILE, OUTPUT_FORMAT};
use crate::command::CommandLine;
use crate::errors::{ConfigError, LasflowError};
use crate::params::{render_decimal, Choice, ChoiceSet, FieldSpec, ParamSchema};
use crate::pipeline::{Pipeline, PipelineBuilder, StageContext, ToolStage, VERBOSE};

const RAMPS: &[Choice] = &[
    Choice::new("gray ramp", &["-gray"]),
    Choice::new("false colors", &["-false"]),
];

const FILTERS: &[Choice] = &[
    Choice::new("ground points only", &["-keep_class", "2"]),
    Choice::new("ground and keypoints", &["-keep_class", "2", "8"]),
    Choice::new("ground and buildings", &["-keep_class", "2", "6"]),
    Choice::new("last return only", &["-last_only"]),
    Choice::new("first return only", &["-first_only"]),
];

const RASTER_FORMATS: &[Choice] = &[
    Choice::new("bil", &["-obil"]),
    Choice::new("asc", &["-oasc"]),
    Choice::new("img", &["-oimg"]),
    Choice::new("tif", &["-otif"]),
    Choice::new("dtm", &["-odtm"]),
    Choice::new("png", &["-opng"]),
    Choice::new("jpg", &["-ojpg"]),
];

/// Positional arguments of `lasgrid`.
pub const SCHEMA: ParamSchema = ParamSchema::new(
    "lasgrid",
    &[
        FieldSpec::text(INPUT),
        FieldSpec::decimal("step"),
        FieldSpec::text("item"),
        FieldSpec::text("operation"),
        FieldSpec::integer("fill"),
        FieldSpec::choice("color_ramp", ChoiceSet::optional(RAMPS)),
        FieldSpec::decimal("min"),
        FieldSpec::decimal("max"),
        FieldSpec::choice("filter", ChoiceSet::optional(FILTERS)),
        FieldSpec::flag("use_bb"),
        FieldSpec::flag("use_tile_bb"),
        FieldSpec::choice(OUTPUT_FORMAT, ChoiceSet::optional(RASTER_FORMATS)),
        FieldSpec::text(OUTPUT_FILE),
        FieldSpec::text(OUTPUT_DIR),
        FieldSpec::text(OUTPUT_APPENDIX),
        FieldSpec::extra(ADDITIONAL),
        FieldSpec::flag(VERBOSE),
    ],
);

pub(crate) fn pipeline() -> Result<Pipeline, ConfigError> {
    PipelineBuilder::new(SCHEMA)
        .stage(ToolStage::new("lasgrid", "lasgrid", build))
        .build()
}

fn build(ctx: &StageContext<'_>) -> Result<CommandLine, LasflowError> {
    let params = ctx.params();
    let mut cmd = ctx.command();
    cmd.arg("-i").quoted(ctx.require_text(INPUT)?);
    cmd.option_decimal("-step", params.decimal("step"), Some(1.0));

    // Item and operation name the lasgrid switch directly.
    if let Some(item) = params.text("item").filter(|item| *item != "elevation") {
        cmd.arg(format!("-{item}"));
    }
    if let Some(op) = params.text("operation").filter(|op| *op != "lowest") {
        cmd.arg(format!("-{op}"));
    }
    cmd.option_integer("-fill", params.integer("fill"), Some(0));

    let ramp = params.choice("color_ramp");
    cmd.choice(ramp);
    if ramp.is_some() {
        if let (Some(min), Some(max)) = (params.decimal("min"), params.decimal("max")) {
            cmd.arg("-set_min_max").arg(render_decimal(min)).arg(render_decimal(max));
        }
    }

    cmd.choice(params.choice("filter"))
        .flag_if(params.flag("use_bb"), "-use_bb")
        .flag_if(params.flag("use_tile_bb"), "-use_tile_bb")
        .choice(params.choice(OUTPUT_FORMAT));
    append_output_paths(&mut cmd, params);
    cmd.extra(params.extra(ADDITIONAL));

    Ok(cmd)
}
