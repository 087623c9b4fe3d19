//! `lasoverage`: mark or remove overage points in flight-line overlap.

use super::{append_output_paths, ADDITIONAL, INPUT, OUTPUT_APPENDIX, OUTPUT_DIR, OUTPUT_FILE, OUTPUT_FORMAT, POINT_FORMATS};
use crate::command::CommandLine;
use crate::errors::{ConfigError, LasflowError};
use crate::params::{Choice, ChoiceSet, FieldSpec, ParamSchema};
use crate::pipeline::{Pipeline, PipelineBuilder, StageContext, ToolStage, VERBOSE};

const MODES: &[Choice] = &[
    Choice::new("flag as withheld", &["-flag_as_withheld"]),
    Choice::new("remove from output", &["-remove_from_output"]),
];

/// Positional arguments of `lasoverage`.
pub const SCHEMA: ParamSchema = ParamSchema::new(
    "lasoverage",
    &[
        FieldSpec::text(INPUT),
        FieldSpec::flag("feet"),
        FieldSpec::decimal("step"),
        FieldSpec::choice("mode", ChoiceSet::optional(MODES)),
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
        .stage(ToolStage::new("lasoverage", "lasoverage", build))
        .build()
}

fn build(ctx: &StageContext<'_>) -> Result<CommandLine, LasflowError> {
    let params = ctx.params();
    let mut cmd = ctx.command();
    cmd.arg("-i").quoted(ctx.require_text(INPUT)?);
    cmd.flag_if(params.flag("feet"), "-feet")
        .option_decimal("-step", params.decimal("step"), Some(1.0))
        .choice(params.choice("mode"))
        .choice(params.choice(OUTPUT_FORMAT));
    append_output_paths(&mut cmd, params);
    cmd.extra(params.extra(ADDITIONAL));

    Ok(cmd)
}

#[cfg(test)]
mod tests {
    use crate::tools::build_single;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_command() {
        let cmd = build_single(
            "lasoverage",
            &["strip.laz", "true", "2,5", "remove from output", "xyzi", "#", "C:\\out", "_ov", "#", "false"],
        )
        .unwrap();

        assert_eq!(
            cmd.argv(),
            vec![
                "-i", "strip.laz", "-feet", "-step", "2.5", "-remove_from_output", "-otxt", "-oparse", "xyzi",
                "-odir", "C:\\out", "-odix", "_ov",
            ]
        );
    }

    #[test]
    fn test_default_step_and_unknown_mode_are_omitted() {
        let cmd = build_single(
            "lasoverage",
            &["strip.laz", "false", "1", "keep everything", "#", "out.laz", "#", "#", "#", "false"],
        )
        .unwrap();

        assert_eq!(cmd.argv(), vec!["-i", "strip.laz", "-o", "out.laz"]);
    }
}
