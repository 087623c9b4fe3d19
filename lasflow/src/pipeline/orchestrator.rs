//! Sequential, fail-fast pipeline execution.

use super::{Pipeline, RunReport, RunState, StageRecord, TempNamespace};
use crate::command::CommandLine;
use crate::errors::{ExecutionError, Result, SchemaError};
use crate::install::LasToolsInstall;
use crate::params::ParamRecord;
use crate::reporter::Reporter;
use crate::runner::ProcessRunner;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Runs pipelines one stage at a time.
///
/// The runner and reporter are injected so that tests can observe every
/// launch and every message.
pub struct Orchestrator<'a> {
    install_root: PathBuf,
    runner: &'a dyn ProcessRunner,
    reporter: &'a dyn Reporter,
}

/// Everything validated before the first stage runs.
struct Prepared {
    params: ParamRecord,
    temp: Option<TempNamespace>,
    programs: Vec<PathBuf>,
}

impl<'a> Orchestrator<'a> {
    /// Creates an orchestrator for the installation at `install_root`.
    pub fn new(
        install_root: impl Into<PathBuf>,
        runner: &'a dyn ProcessRunner,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            install_root: install_root.into(),
            runner,
            reporter,
        }
    }

    /// The installation root.
    #[must_use]
    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    /// Runs a pipeline against a host argument vector.
    ///
    /// Every abort is reported through the reporter before the error is
    /// returned. A failing stage leaves the temp namespace untouched so its
    /// files can be inspected.
    ///
    /// # Errors
    ///
    /// Returns the first configuration, schema or execution error.
    pub async fn run<S: AsRef<str> + Sync>(&self, pipeline: &Pipeline, args: &[S]) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        let span = info_span!("run", tool = pipeline.name(), %run_id);

        async {
            self.reporter.message(&format!("Starting {} ...", pipeline.name()));
            let mut report = RunReport::new(run_id, pipeline.name());

            match self.execute(pipeline, args, &mut report).await {
                Ok(()) => {
                    report.finish(RunState::Done);
                    info!(stages = report.stages.len(), removed = report.removed_files, "Run finished");
                    self.reporter.message(&format!("Success. {} done.", pipeline.name()));
                    Ok(report)
                }
                Err(err) => {
                    warn!(state = %report.state, code = err.code(), error = %err, "Run aborted");
                    report.finish(RunState::Aborted);
                    self.reporter.message(&format!("Error. {err}"));
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Validates everything and builds every command line without running anything.
    ///
    /// # Errors
    ///
    /// Returns the first configuration or schema error.
    pub fn plan<S: AsRef<str>>(&self, pipeline: &Pipeline, args: &[S]) -> Result<Vec<CommandLine>> {
        let prepared = self.prepare(pipeline, args)?;
        pipeline
            .stages()
            .iter()
            .zip(&prepared.programs)
            .map(|(stage, program)| stage.build(&prepared.params, program, prepared.temp.as_ref()))
            .collect()
    }

    fn prepare<S: AsRef<str>>(&self, pipeline: &Pipeline, args: &[S]) -> Result<Prepared> {
        let params = pipeline.schema().decode(args)?;
        let install = LasToolsInstall::open(&self.install_root, self.reporter)?;

        let temp = match pipeline.temp() {
            Some(declared) => {
                let dir = params
                    .text(declared.field)
                    .ok_or(SchemaError::MissingValue { field: declared.field })?;
                Some(TempNamespace::claim(dir, declared.cleanup, self.reporter)?)
            }
            None => None,
        };

        // Stages may share a program; each is looked up and reported once.
        let mut resolved: Vec<(&str, PathBuf)> = Vec::new();
        let mut programs = Vec::with_capacity(pipeline.stages().len());
        for stage in pipeline.stages() {
            let name = stage.program();
            let path = match resolved.iter().find(|(known, _)| *known == name) {
                Some((_, path)) => path.clone(),
                None => {
                    let path = install.executable(name, self.reporter)?;
                    resolved.push((name, path.clone()));
                    path
                }
            };
            programs.push(path);
        }

        Ok(Prepared {
            params,
            temp,
            programs,
        })
    }

    async fn execute<S: AsRef<str> + Sync>(
        &self,
        pipeline: &Pipeline,
        args: &[S],
        report: &mut RunReport,
    ) -> Result<()> {
        let prepared = self.prepare(pipeline, args)?;
        let tool = pipeline.name();

        for (index, (stage, program)) in pipeline.stages().iter().zip(&prepared.programs).enumerate() {
            advance(report, RunState::Stage(index + 1));

            if let (Some(ns), Some(pattern)) = (prepared.temp.as_ref(), stage.input()) {
                let inputs = ns.matching(pattern)?;
                debug!(stage = stage.name(), inputs = inputs.len(), %pattern, "Stage inputs");
                if inputs.is_empty() {
                    return Err(ExecutionError::EmptyInput {
                        tool: tool.to_string(),
                        stage: stage.name().to_string(),
                        pattern: pattern.to_string(),
                    }
                    .into());
                }
            }

            let command = stage.build(&prepared.params, program, prepared.temp.as_ref())?;
            self.reporter.message("LAStools command line:");
            self.reporter.message(&command.display());

            let started_at = Utc::now();
            let result = self
                .runner
                .run(&command)
                .await
                .map_err(|source| ExecutionError::Launch {
                    tool: tool.to_string(),
                    stage: stage.name().to_string(),
                    source,
                })?;
            self.reporter.message(&result.output);

            report.stages.push(StageRecord {
                name: stage.name().to_string(),
                command: command.display(),
                exit_code: result.exit_code,
                started_at,
                ended_at: Utc::now(),
            });

            if !result.is_success() {
                return Err(ExecutionError::StageFailed {
                    tool: tool.to_string(),
                    stage: stage.name().to_string(),
                    exit_code: result.exit_code,
                }
                .into());
            }

            if pipeline.is_multi_stage() {
                self.reporter.message(&format!("{} step done.", stage.name()));
            }
        }

        if let Some(ns) = prepared.temp.as_ref() {
            advance(report, RunState::Cleanup);
            self.reporter.message("clean-up:");
            self.reporter
                .message(&format!("\"{}\"", ns.glob(&ns.cleanup_pattern()).display()));

            let removed = ns.cleanup().map_err(|source| ExecutionError::Cleanup {
                tool: tool.to_string(),
                source,
            })?;
            report.removed_files = removed;
            self.reporter.message(&format!("removed {removed} temporary files"));
            self.reporter.message("clean-up step done.");
        }

        Ok(())
    }
}

fn advance(report: &mut RunReport, next: RunState) {
    debug_assert!(report.state.can_advance_to(next), "{} -> {next}", report.state);
    debug!(from = %report.state, to = %next, "Run state");
    report.state = next;
}

