//! Tool catalog.
//!
//! Every tool is a [`Pipeline`]: a positional schema plus one or more
//! stages. Single-stage tools have no temp namespace and no cleanup.

mod huge_file_normalize;
mod las2las_project;
mod las2las_transform;
mod lasclip;
mod lasgrid;
mod lasinfo;
mod lasoverage;
mod lasvalidate;

use crate::command::CommandLine;
use crate::errors::{ConfigError, LasflowError, SchemaError};
use crate::params::{Choice, ParamRecord};
use crate::pipeline::{Pipeline, StageContext};
use serde::Serialize;
use std::path::Path;

pub(crate) const INPUT: &str = "input";
pub(crate) const INPUT_DIR: &str = "input_dir";
pub(crate) const WILDCARDS: &str = "wildcards";
pub(crate) const OUTPUT_FORMAT: &str = "output_format";
pub(crate) const OUTPUT_FILE: &str = "output_file";
pub(crate) const OUTPUT_DIR: &str = "output_dir";
pub(crate) const OUTPUT_APPENDIX: &str = "output_appendix";
pub(crate) const CORES: &str = "cores";
pub(crate) const ADDITIONAL: &str = "additional";

/// Point-cloud output formats shared by most single-stage tools.
pub(crate) const POINT_FORMATS: &[Choice] = &[
    Choice::new("las", &["-olas"]),
    Choice::new("laz", &["-olaz"]),
    Choice::new("bin", &["-obin"]),
    Choice::new("xyz", &["-otxt"]),
    Choice::new("xyzi", &["-otxt", "-oparse", "xyzi"]),
    Choice::new("txyzi", &["-otxt", "-oparse", "txyzi"]),
];

/// A registered tool.
#[derive(Debug, Clone, Copy)]
pub struct ToolEntry {
    /// Name used on the command line.
    pub name: &'static str,
    /// One-line description.
    pub summary: &'static str,
    pipeline: fn() -> Result<Pipeline, ConfigError>,
}

impl ToolEntry {
    /// Builds the tool's pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPipeline`] if the definition is inconsistent.
    pub fn pipeline(&self) -> Result<Pipeline, ConfigError> {
        (self.pipeline)()
    }
}

/// All tools, in listing order.
pub const TOOLS: &[ToolEntry] = &[
    ToolEntry {
        name: "las2las_project",
        summary: "Reproject LiDAR between UTM, long/lat and state plane systems",
        pipeline: las2las_project::pipeline,
    },
    ToolEntry {
        name: "lasgrid",
        summary: "Grid LiDAR points into a raster",
        pipeline: lasgrid::pipeline,
    },
    ToolEntry {
        name: "lasinfo",
        summary: "Report the contents of a LiDAR file or repair its header",
        pipeline: lasinfo::pipeline,
    },
    ToolEntry {
        name: "lasoverage",
        summary: "Find and flag or remove overage points of flight-line overlap",
        pipeline: lasoverage::pipeline,
    },
    ToolEntry {
        name: "lasvalidate",
        summary: "Validate LiDAR files against the LAS specification",
        pipeline: lasvalidate::pipeline,
    },
    ToolEntry {
        name: "las2las_transform",
        summary: "Apply coordinate transforms to a folder of LiDAR files",
        pipeline: las2las_transform::pipeline,
    },
    ToolEntry {
        name: "lasclip",
        summary: "Clip a folder of LiDAR files against polygons",
        pipeline: lasclip::pipeline,
    },
    ToolEntry {
        name: "huge_file_normalize",
        summary: "Height-normalize a very large file through a tiled multi-core pipeline",
        pipeline: huge_file_normalize::pipeline,
    },
];

/// Looks up a tool by name.
///
/// # Errors
///
/// Returns [`SchemaError::UnknownTool`] for an unregistered name.
pub fn find(name: &str) -> Result<&'static ToolEntry, SchemaError> {
    TOOLS
        .iter()
        .find(|tool| tool.name == name)
        .ok_or_else(|| SchemaError::unknown_tool(name))
}

/// Builds the pipeline of a tool by name.
///
/// # Errors
///
/// Returns [`SchemaError::UnknownTool`] or [`ConfigError::InvalidPipeline`].
pub fn pipeline(name: &str) -> Result<Pipeline, LasflowError> {
    Ok(find(name)?.pipeline()?)
}

/// Listing entry for a tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    /// Tool name.
    pub name: &'static str,
    /// One-line description.
    pub summary: &'static str,
    /// Number of positional arguments.
    pub arg_count: usize,
    /// Argument names in order.
    pub args: Vec<&'static str>,
    /// Stage names in order.
    pub stages: Vec<&'static str>,
}

/// Describes every registered tool.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidPipeline`] if any definition is inconsistent.
pub fn catalog() -> Result<Vec<ToolInfo>, ConfigError> {
    TOOLS
        .iter()
        .map(|tool| {
            let pipeline = tool.pipeline()?;
            Ok(ToolInfo {
                name: tool.name,
                summary: tool.summary,
                arg_count: pipeline.schema().arg_count(),
                args: pipeline.schema().fields.iter().map(|f| f.name).collect(),
                stages: pipeline.stages().iter().map(|s| s.name()).collect(),
            })
        })
        .collect()
}

/// Appends `-o`, `-odir` and `-odix` for whichever are set.
pub(crate) fn append_output_paths(cmd: &mut CommandLine, params: &ParamRecord) {
    cmd.option_quoted("-o", params.text(OUTPUT_FILE))
        .option_quoted("-odir", params.text(OUTPUT_DIR))
        .option_quoted("-odix", params.text(OUTPUT_APPENDIX));
}

/// Appends one `-i <dir>/<wildcard>` per whitespace-separated wildcard.
pub(crate) fn append_folder_inputs(cmd: &mut CommandLine, ctx: &StageContext<'_>) -> Result<(), SchemaError> {
    let dir = Path::new(ctx.require_text(INPUT_DIR)?);
    let wildcards = ctx.require_text(WILDCARDS)?;
    for wildcard in wildcards.split_whitespace() {
        cmd.arg("-i").quoted_path(&dir.join(wildcard));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn build_single(name: &str, args: &[&str]) -> Result<CommandLine, LasflowError> {
    let pipeline = pipeline(name)?;
    let params = pipeline.schema().decode(&crate::testing::fixtures::args(args))?;
    pipeline.stages()[0].build(&params, Path::new(name), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::FieldKind;
    use crate::pipeline::VERBOSE;

    #[test]
    fn test_every_tool_builds() {
        let infos = catalog().unwrap();
        assert_eq!(infos.len(), TOOLS.len());
        for info in &infos {
            assert!(!info.stages.is_empty(), "{}", info.name);
        }
    }

    #[test]
    fn test_every_tool_ends_with_verbose_flag() {
        for tool in TOOLS {
            let pipeline = tool.pipeline().unwrap();
            let last = pipeline.schema().fields.last().unwrap();
            assert_eq!(last.name, VERBOSE, "{}", tool.name);
            assert_eq!(last.kind, FieldKind::Flag, "{}", tool.name);
        }
    }

    #[test]
    fn test_argument_counts() {
        let counts: Vec<(&str, usize)> = catalog()
            .unwrap()
            .into_iter()
            .map(|info| (info.name, info.arg_count))
            .collect();

        assert_eq!(
            counts,
            vec![
                ("las2las_project", 19),
                ("lasgrid", 17),
                ("lasinfo", 13),
                ("lasoverage", 10),
                ("lasvalidate", 5),
                ("las2las_transform", 15),
                ("lasclip", 14),
                ("huge_file_normalize", 12),
            ]
        );
    }

    #[test]
    fn test_unknown_tool() {
        let err = pipeline("lasfoo").unwrap_err();
        assert_eq!(err.code(), "SCHEMA-TOOL");
    }
}
