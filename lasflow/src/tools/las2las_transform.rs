//! `las2las_transform`: apply coordinate operations to a folder of files.

use super::{
    append_folder_inputs, ADDITIONAL, CORES, INPUT_DIR, OUTPUT_APPENDIX, OUTPUT_DIR, OUTPUT_FORMAT, POINT_FORMATS,
    WILDCARDS,
};
use crate::command::CommandLine;
use crate::errors::{ConfigError, LasflowError};
use crate::params::{render_decimal, ChoiceSet, FieldSpec, ParamSchema};
use crate::pipeline::{Pipeline, PipelineBuilder, StageContext, ToolStage, VERBOSE};

/// Operation/value field pairs; an operation is only emitted with its value.
const VALUED_OPERATIONS: [(&str, &str); 3] = [
    ("operation_1", "value_1"),
    ("operation_2", "value_2"),
    ("operation_3", "value_3"),
];

/// Positional arguments of `las2las_transform`.
pub const SCHEMA: ParamSchema = ParamSchema::new(
    "las2las_transform",
    &[
        FieldSpec::text(INPUT_DIR),
        FieldSpec::text(WILDCARDS),
        FieldSpec::text("operation_1"),
        FieldSpec::decimal("value_1"),
        FieldSpec::text("operation_2"),
        FieldSpec::decimal("value_2"),
        FieldSpec::text("operation_3"),
        FieldSpec::decimal("value_3"),
        FieldSpec::text("operation_4"),
        FieldSpec::choice(OUTPUT_FORMAT, ChoiceSet::optional(POINT_FORMATS)),
        FieldSpec::text(OUTPUT_DIR),
        FieldSpec::text(OUTPUT_APPENDIX),
        FieldSpec::integer(CORES),
        FieldSpec::extra(ADDITIONAL),
        FieldSpec::flag(VERBOSE),
    ],
);

pub(crate) fn pipeline() -> Result<Pipeline, ConfigError> {
    PipelineBuilder::new(SCHEMA)
        .stage(ToolStage::new("las2las", "las2las", build))
        .build()
}

fn build(ctx: &StageContext<'_>) -> Result<CommandLine, LasflowError> {
    let params = ctx.params();
    let mut cmd = ctx.command();
    append_folder_inputs(&mut cmd, ctx)?;

    for (operation, value) in VALUED_OPERATIONS {
        if let (Some(op), Some(value)) = (params.text(operation), params.decimal(value)) {
            cmd.arg(format!("-{op}")).arg(render_decimal(value));
        }
    }
    if let Some(op) = params.text("operation_4") {
        cmd.arg(format!("-{op}"));
    }

    cmd.choice(params.choice(OUTPUT_FORMAT))
        .option_quoted("-odir", params.text(OUTPUT_DIR))
        .option_quoted("-odix", params.text(OUTPUT_APPENDIX))
        .option_integer("-cores", params.integer(CORES), Some(1))
        .extra(params.extra(ADDITIONAL));

    Ok(cmd)
}

#[cfg(test)]
mod tests {
    use crate::errors::{LasflowError, SchemaError};
    use crate::tools::build_single;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    #[test]
    fn test_wildcards_and_operations() {
        let cmd = build_single(
            "las2las_transform",
            &[
                "flights", "*.las *.laz", "translate_z", "-12,5", "scale_x", "#", "clamp_z_below", "0",
                "switch_x_y", "laz", "out", "_t", "4", "#", "false",
            ],
        )
        .unwrap();

        let las = Path::new("flights").join("*.las").display().to_string();
        let laz = Path::new("flights").join("*.laz").display().to_string();
        assert_eq!(
            cmd.argv(),
            vec![
                "-i", las.as_str(), "-i", laz.as_str(), "-translate_z", "-12.5", "-clamp_z_below", "0.0",
                "-switch_x_y", "-olaz", "-odir", "out", "-odix", "_t", "-cores", "4",
            ]
        );
        assert!(cmd.display().contains(&format!("-i \"{las}\"")));
    }

    #[test]
    fn test_single_core_is_omitted() {
        let cmd = build_single(
            "las2las_transform",
            &["flights", "*.laz", "#", "#", "#", "#", "#", "#", "#", "#", "#", "#", "1", "-drop_class 7", "true"],
        )
        .unwrap();

        assert!(!cmd.has_arg("-cores"));
        assert_eq!(cmd.argv()[0], "-v");
        assert_eq!(&cmd.argv()[3..], ["-drop_class", "7"]);
    }

    #[test]
    fn test_wildcards_are_required() {
        let err = build_single(
            "las2las_transform",
            &["flights", "#", "#", "#", "#", "#", "#", "#", "#", "#", "#", "#", "1", "#", "false"],
        )
        .unwrap_err();

        assert!(matches!(err, LasflowError::Schema(SchemaError::MissingValue { field: "wildcards" })));
    }
}
