//! `lasinfo`: report file contents or repair header fields.

use super::{ADDITIONAL, INPUT, OUTPUT_FILE};
use crate::command::CommandLine;
use crate::errors::{ConfigError, LasflowError};
use crate::params::{Choice, ChoiceSet, FieldSpec, ParamSchema};
use crate::pipeline::{Pipeline, PipelineBuilder, StageContext, ToolStage, VERBOSE};

const DESTINATIONS: &[Choice] = &[
    Choice::new("none", &["-quiet"]),
    Choice::new("stdout", &["-stdout"]),
    Choice::new("*_info.txt", &["-odix", "_info", "-otxt"]),
];

/// Positional arguments of `lasinfo`.
pub const SCHEMA: ParamSchema = ParamSchema::new(
    "lasinfo",
    &[
        FieldSpec::text(INPUT),
        FieldSpec::text(OUTPUT_FILE),
        FieldSpec::choice("destination", ChoiceSet::optional(DESTINATIONS)),
        FieldSpec::flag("no_header"),
        FieldSpec::flag("no_vlrs"),
        FieldSpec::flag("no_points"),
        FieldSpec::flag("no_min_max"),
        FieldSpec::flag("compute_density"),
        FieldSpec::flag("progress"),
        FieldSpec::flag("repair_counters"),
        FieldSpec::flag("repair_bb"),
        FieldSpec::extra(ADDITIONAL),
        FieldSpec::flag(VERBOSE),
    ],
);

pub(crate) fn pipeline() -> Result<Pipeline, ConfigError> {
    PipelineBuilder::new(SCHEMA)
        .stage(ToolStage::new("lasinfo", "lasinfo", build))
        .build()
}

fn build(ctx: &StageContext<'_>) -> Result<CommandLine, LasflowError> {
    let params = ctx.params();
    let mut cmd = ctx.command();
    cmd.arg("-i").quoted(ctx.require_text(INPUT)?);

    // An explicit output file wins over the destination choice.
    if params.is_set(OUTPUT_FILE) {
        cmd.option_quoted("-o", params.text(OUTPUT_FILE));
    } else {
        cmd.choice(params.choice("destination"));
    }

    cmd.flag_if(params.flag("no_header"), "-nh")
        .flag_if(params.flag("no_vlrs"), "-nv")
        .flag_if(params.flag("no_points"), "-nc")
        .flag_if(params.flag("no_min_max"), "-nmm")
        .flag_if(params.flag("compute_density"), "-cd");
    if params.flag("progress") {
        cmd.arg("-progress").arg("1000000");
    }
    cmd.flag_if(params.flag("repair_counters"), "-repair_counters")
        .flag_if(params.flag("repair_bb"), "-repair_bb")
        .extra(params.extra(ADDITIONAL));

    Ok(cmd)
}

#[cfg(test)]
mod tests {
    use crate::tools::build_single;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let cmd = build_single(
            "lasinfo",
            &["a.las", "#", "#", "false", "false", "false", "false", "false", "false", "false", "false", "#", "false"],
        )
        .unwrap();

        assert_eq!(cmd.argv(), vec!["-i", "a.las"]);
        assert_eq!(cmd.display(), "\"lasinfo\" -i \"a.las\"");
    }

    #[test]
    fn test_destination_and_switches() {
        let cmd = build_single(
            "lasinfo",
            &["a.las", "#", "*_info.txt", "true", "true", "false", "true", "true", "true", "true", "true", "-week", "true"],
        )
        .unwrap();

        assert_eq!(
            cmd.argv(),
            vec![
                "-v", "-i", "a.las", "-odix", "_info", "-otxt", "-nh", "-nv", "-nmm", "-cd", "-progress",
                "1000000", "-repair_counters", "-repair_bb", "-week",
            ]
        );
    }

    #[test]
    fn test_output_file_overrides_destination() {
        let cmd = build_single(
            "lasinfo",
            &["a.las", "report.txt", "stdout", "false", "false", "false", "false", "false", "false", "false", "false", "#", "false"],
        )
        .unwrap();

        assert_eq!(cmd.argv(), vec!["-i", "a.las", "-o", "report.txt"]);
    }
}
