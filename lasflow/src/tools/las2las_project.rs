//! `las2las_project`: reproject between UTM, geographic and state plane
//! coordinates.

use super::{append_output_paths, ADDITIONAL, INPUT, OUTPUT_APPENDIX, OUTPUT_DIR, OUTPUT_FILE, OUTPUT_FORMAT, POINT_FORMATS};
use crate::command::CommandLine;
use crate::errors::{ConfigError, LasflowError, SchemaError};
use crate::params::{Choice, ChoiceSet, FieldSpec, ParamRecord, ParamSchema};
use crate::pipeline::{Pipeline, PipelineBuilder, StageContext, ToolStage, VERBOSE};

const UTM: &str = "UTM";

const SOURCE_PROJECTIONS: &[Choice] = &[
    Choice::new(UTM, &["-utm"]),
    Choice::new("Longitude Latitude", &["-longlat"]),
    Choice::new("State Plane NAD83", &["-sp83"]),
    Choice::new("State Plane NAD27", &["-sp27"]),
];

// The host dialog labels target state planes with a space before the year.
const TARGET_PROJECTIONS: &[Choice] = &[
    Choice::new(UTM, &["-target_utm"]),
    Choice::new("Longitude Latitude", &["-target_longlat"]),
    Choice::new("State Plane NAD 83", &["-target_sp83"]),
    Choice::new("State Plane NAD 27", &["-target_sp27"]),
];

/// Positional arguments of `las2las_project`.
pub const SCHEMA: ParamSchema = ParamSchema::new(
    "las2las_project",
    &[
        FieldSpec::text(INPUT),
        FieldSpec::choice("projection", ChoiceSet::optional(SOURCE_PROJECTIONS)),
        FieldSpec::text("utm_zone"),
        FieldSpec::flag("utm_north"),
        FieldSpec::text("state_plane"),
        FieldSpec::flag("feet"),
        FieldSpec::flag("elevation_feet"),
        FieldSpec::choice("target_projection", ChoiceSet::required(TARGET_PROJECTIONS)),
        FieldSpec::text("target_utm_zone"),
        FieldSpec::flag("target_utm_north"),
        FieldSpec::text("target_state_plane"),
        FieldSpec::flag("target_feet"),
        FieldSpec::flag("target_elevation_feet"),
        FieldSpec::choice(OUTPUT_FORMAT, ChoiceSet::optional(POINT_FORMATS)),
        FieldSpec::text(OUTPUT_FILE),
        FieldSpec::text(OUTPUT_DIR),
        FieldSpec::text(OUTPUT_APPENDIX),
        FieldSpec::extra(ADDITIONAL),
        FieldSpec::flag(VERBOSE),
    ],
);

pub(crate) fn pipeline() -> Result<Pipeline, ConfigError> {
    PipelineBuilder::new(SCHEMA)
        .stage(ToolStage::new("las2las", "las2las", build))
        .build()
}

/// Field names for one side of the projection.
struct Side {
    projection: &'static str,
    zone: &'static str,
    north: &'static str,
    state_plane: &'static str,
}

const SOURCE: Side = Side {
    projection: "projection",
    zone: "utm_zone",
    north: "utm_north",
    state_plane: "state_plane",
};

const TARGET: Side = Side {
    projection: "target_projection",
    zone: "target_utm_zone",
    north: "target_utm_north",
    state_plane: "target_state_plane",
};

fn append_projection(cmd: &mut CommandLine, params: &ParamRecord, side: &Side) -> Result<(), SchemaError> {
    let Some(choice) = params.choice(side.projection) else {
        return Ok(());
    };
    cmd.choice(Some(choice));

    if choice.label == UTM {
        let zone = params
            .text(side.zone)
            .ok_or(SchemaError::MissingValue { field: side.zone })?;
        let hemisphere = if params.flag(side.north) { 'N' } else { 'K' };
        cmd.arg(format!("{zone}{hemisphere}"));
    } else if choice.label.starts_with("State Plane") {
        let plane = params
            .text(side.state_plane)
            .ok_or(SchemaError::MissingValue { field: side.state_plane })?;
        cmd.arg(plane);
    }
    Ok(())
}

fn build(ctx: &StageContext<'_>) -> Result<CommandLine, LasflowError> {
    let params = ctx.params();
    let mut cmd = ctx.command();
    cmd.arg("-i").quoted(ctx.require_text(INPUT)?);

    append_projection(&mut cmd, params, &SOURCE)?;
    cmd.flag_if(params.flag("feet"), "-feet")
        .flag_if(params.flag("elevation_feet"), "-elevation_feet");

    append_projection(&mut cmd, params, &TARGET)?;
    cmd.flag_if(params.flag("target_feet"), "-target_feet")
        .flag_if(params.flag("target_elevation_feet"), "-target_elevation_feet")
        .choice(params.choice(OUTPUT_FORMAT));
    append_output_paths(&mut cmd, params);
    cmd.extra(params.extra(ADDITIONAL));

    Ok(cmd)
}
