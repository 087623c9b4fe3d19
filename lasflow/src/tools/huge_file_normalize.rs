//! `huge_file_normalize`: height-normalize a file too large to process in
//! one piece.
//!
//! The input is cut into reversible tiles inside the temp directory, each
//! tile is ground-classified and then height-normalized, and the tiles are
//! finally merged back into a single output. Intermediate tiles are told
//! apart by suffix: `lasground` appends `_g` and `lasheight` appends `h`.

use super::{CORES, INPUT, OUTPUT_FILE, OUTPUT_FORMAT};
use crate::command::CommandLine;
use crate::errors::{ConfigError, LasflowError, SchemaError};
use crate::params::{Choice, ChoiceSet, FieldSpec, ParamSchema};
use crate::pipeline::{FilePattern, Pipeline, PipelineBuilder, StageContext, ToolStage, VERBOSE};
use std::path::PathBuf;

const TEMP_DIR: &str = "temp_dir";

/// Name of the tiles written by the first stage.
const TILE_NAME: &str = "temp_huge_normalize.laz";

const TILES: FilePattern = FilePattern::new("temp_huge_normalize", ".laz");
const GROUND: FilePattern = FilePattern::new("temp_huge_normalize", "_g.laz");
const HEIGHT: FilePattern = FilePattern::new("temp_huge_normalize", "_gh.laz");

const TERRAINS: &[Choice] = &[
    Choice::new("wilderness", &["-wilderness"]),
    Choice::new("city or warehouses", &["-city"]),
    Choice::new("towns or flats", &["-town"]),
    Choice::new("metropolis", &["-metro"]),
];

const GRANULARITIES: &[Choice] = &[
    Choice::new("coarse", &[]),
    Choice::new("fine", &["-fine"]),
    Choice::new("extra fine", &["-extra_fine"]),
    Choice::new("ultra fine", &["-ultra_fine"]),
];

const FORMATS: &[Choice] = &[
    Choice::new("las", &["-olas"]),
    Choice::new("laz", &["-olaz"]),
    Choice::new("bin", &["-obin"]),
    Choice::new("xyzc", &["-otxt", "-oparse", "xyzc"]),
    Choice::new("xyzci", &["-otxt", "-oparse", "xyzci"]),
    Choice::new("txyzc", &["-otxt", "-oparse", "txyzc"]),
    Choice::new("txyzci", &["-otxt", "-oparse", "txyzci"]),
];

/// Positional arguments of `huge_file_normalize`.
pub const SCHEMA: ParamSchema = ParamSchema::new(
    "huge_file_normalize",
    &[
        FieldSpec::text(INPUT),
        FieldSpec::decimal("tile_size"),
        FieldSpec::decimal("buffer"),
        FieldSpec::choice("terrain", ChoiceSet::optional(TERRAINS)),
        FieldSpec::choice("granularity", ChoiceSet::optional(GRANULARITIES)),
        FieldSpec::decimal("drop_above"),
        FieldSpec::decimal("drop_below"),
        FieldSpec::integer(CORES),
        FieldSpec::text(TEMP_DIR),
        FieldSpec::text(OUTPUT_FILE),
        FieldSpec::choice(OUTPUT_FORMAT, ChoiceSet::optional(FORMATS)),
        FieldSpec::flag(VERBOSE),
    ],
);

pub(crate) fn pipeline() -> Result<Pipeline, ConfigError> {
    PipelineBuilder::new(SCHEMA)
        .stage(ToolStage::new("lastile", "lastile", tile).writes(TILES))
        .stage(ToolStage::new("lasground", "lasground", ground).reads(TILES).writes(GROUND))
        .stage(ToolStage::new("lasheight", "lasheight", height).reads(GROUND).writes(HEIGHT))
        .stage(ToolStage::new("lastile (reverse)", "lastile", merge).reads(HEIGHT))
        .temp_namespace(TEMP_DIR, TILES)
        .build()
}

fn input_glob(ctx: &StageContext<'_>) -> Result<PathBuf, SchemaError> {
    ctx.input_glob().ok_or(SchemaError::MissingValue { field: TEMP_DIR })
}

fn tile(ctx: &StageContext<'_>) -> Result<CommandLine, LasflowError> {
    let params = ctx.params();
    let temp_dir = ctx.temp_dir().ok_or(SchemaError::MissingValue { field: TEMP_DIR })?;

    let mut cmd = ctx.command();
    cmd.arg("-i").quoted(ctx.require_text(INPUT)?);
    cmd.option_decimal("-tile_size", params.decimal("tile_size"), Some(1000.0))
        .option_decimal("-buffer", params.decimal("buffer"), Some(0.0))
        .arg("-reversible")
        .arg("-odir")
        .quoted_path(temp_dir)
        .arg("-o")
        .arg(TILE_NAME)
        .arg("-olaz");
    Ok(cmd)
}

fn ground(ctx: &StageContext<'_>) -> Result<CommandLine, LasflowError> {
    let params = ctx.params();
    let mut cmd = ctx.command();
    cmd.arg("-i").quoted_path(&input_glob(ctx)?);
    cmd.choice(params.choice("terrain"))
        .choice(params.choice("granularity"))
        .arg("-odix")
        .arg("_g")
        .arg("-olaz")
        .option_integer("-cores", params.integer(CORES), Some(1));
    Ok(cmd)
}

fn height(ctx: &StageContext<'_>) -> Result<CommandLine, LasflowError> {
    let params = ctx.params();
    let mut cmd = ctx.command();
    cmd.arg("-i").quoted_path(&input_glob(ctx)?);
    cmd.arg("-replace_z")
        .option_decimal("-drop_above", params.decimal("drop_above"), None)
        .option_decimal("-drop_below", params.decimal("drop_below"), None)
        .arg("-odix")
        .arg("h")
        .arg("-olaz")
        .option_integer("-cores", params.integer(CORES), Some(1));
    Ok(cmd)
}

fn merge(ctx: &StageContext<'_>) -> Result<CommandLine, LasflowError> {
    let params = ctx.params();
    let mut cmd = ctx.command();
    cmd.arg("-i").quoted_path(&input_glob(ctx)?);
    cmd.arg("-reverse_tiling")
        .option_quoted("-o", params.text(OUTPUT_FILE))
        .choice(params.choice(OUTPUT_FORMAT));
    Ok(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::TempNamespace;
    use crate::reporter::CollectingReporter;
    use crate::testing::fixtures::args;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    #[test]
    fn test_stage_chain() {
        let pipeline = pipeline().unwrap();
        let names: Vec<_> = pipeline.stages().iter().map(ToolStage::name).collect();
        let programs: Vec<_> = pipeline.stages().iter().map(ToolStage::program).collect();

        assert_eq!(names, vec!["lastile", "lasground", "lasheight", "lastile (reverse)"]);
        assert_eq!(programs, vec!["lastile", "lasground", "lasheight", "lastile"]);
        assert_eq!(pipeline.temp().map(|t| t.cleanup), Some(TILES));
    }

    #[test]
    fn test_commands_read_previous_stage_output() {
        let dir = tempfile::tempdir().unwrap();
        let ns = TempNamespace::claim(dir.path(), TILES, &CollectingReporter::new()).unwrap();
        let pipeline = pipeline().unwrap();
        let params = SCHEMA
            .decode(&args(&[
                "huge.laz", "1000", "0", "metropolis", "ultra fine", "50,5", "#", "1",
                &dir.path().display().to_string(), "#", "txyzci", "true",
            ]))
            .unwrap();

        let commands: Vec<CommandLine> = pipeline
            .stages()
            .iter()
            .map(|stage| stage.build(&params, Path::new(stage.program()), Some(&ns)).unwrap())
            .collect();

        let tmp = dir.path().display().to_string();
        let glob = |p: &FilePattern| dir.path().join(p.to_string()).display().to_string();
        assert_eq!(
            commands[0].argv(),
            vec!["-v", "-i", "huge.laz", "-reversible", "-odir", tmp.as_str(), "-o", TILE_NAME, "-olaz"]
        );
        assert_eq!(
            commands[1].argv(),
            vec!["-v", "-i", glob(&TILES).as_str(), "-metro", "-ultra_fine", "-odix", "_g", "-olaz"]
        );
        assert_eq!(
            commands[2].argv(),
            vec!["-v", "-i", glob(&GROUND).as_str(), "-replace_z", "-drop_above", "50.5", "-odix", "h", "-olaz"]
        );
        assert_eq!(
            commands[3].argv(),
            vec!["-v", "-i", glob(&HEIGHT).as_str(), "-reverse_tiling", "-otxt", "-oparse", "txyzci"]
        );
        assert!(commands[1].display().contains(&format!("\"{}\"", glob(&TILES))));
    }

    #[test]
    fn test_coarse_granularity_adds_nothing() {
        let choice = GRANULARITIES.iter().find(|c| c.label == "coarse").unwrap();
        assert!(choice.flags.is_empty());
    }

    #[test]
    fn test_stages_need_temp_namespace() {
        let pipeline = pipeline().unwrap();
        let params = SCHEMA
            .decode(&args(&["a.las", "#", "#", "#", "#", "#", "#", "#", "#", "#", "#", "false"]))
            .unwrap();

        let err = pipeline.stages()[1].build(&params, Path::new("lasground"), None).unwrap_err();
        assert!(matches!(err, LasflowError::Schema(SchemaError::MissingValue { field: TEMP_DIR })));
    }
}
