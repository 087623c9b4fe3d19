//! Pipeline builder with validation.

use super::{FilePattern, ToolStage};
use crate::errors::ConfigError;
use crate::params::ParamSchema;
use std::collections::HashSet;

/// Where a pipeline keeps its intermediate files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TempSpec {
    /// The parameter holding the temp directory.
    pub field: &'static str,
    /// Files removed once every stage has succeeded.
    pub cleanup: FilePattern,
}

/// A validated, ordered sequence of stages for one tool.
#[derive(Debug, Clone)]
pub struct Pipeline {
    name: &'static str,
    schema: ParamSchema,
    stages: Vec<ToolStage>,
    temp: Option<TempSpec>,
}

impl Pipeline {
    /// The tool name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The positional schema.
    #[must_use]
    pub fn schema(&self) -> &ParamSchema {
        &self.schema
    }

    /// The stages in execution order.
    #[must_use]
    pub fn stages(&self) -> &[ToolStage] {
        &self.stages
    }

    /// The shared temp namespace, if the pipeline uses one.
    #[must_use]
    pub fn temp(&self) -> Option<&TempSpec> {
        self.temp.as_ref()
    }

    /// Returns true if the pipeline has more than one stage.
    #[must_use]
    pub fn is_multi_stage(&self) -> bool {
        self.stages.len() > 1
    }
}

/// Builder for creating validated pipelines.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    name: &'static str,
    schema: ParamSchema,
    stages: Vec<ToolStage>,
    temp: Option<TempSpec>,
}

impl PipelineBuilder {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn new(schema: ParamSchema) -> Self {
        Self {
            name: schema.tool,
            schema,
            stages: Vec::new(),
            temp: None,
        }
    }

    /// Appends a stage.
    #[must_use]
    pub fn stage(mut self, stage: ToolStage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Declares the shared temp namespace.
    #[must_use]
    pub fn temp_namespace(mut self, field: &'static str, cleanup: FilePattern) -> Self {
        self.temp = Some(TempSpec { field, cleanup });
        self
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Builds the pipeline.
    ///
    /// Each stage's declared output must be exactly the next stage's declared
    /// input, so a naming drift is caught here rather than as an empty file
    /// set at run time.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPipeline`] if the pipeline is empty, has
    /// duplicate stage names, a broken pattern chain, or temp files the
    /// cleanup pattern would miss.
    pub fn build(self) -> Result<Pipeline, ConfigError> {
        if self.stages.is_empty() {
            return Err(self.invalid("pipeline has no stages"));
        }

        let mut seen = HashSet::new();
        for stage in &self.stages {
            if !seen.insert(stage.name()) {
                return Err(self.invalid(format!("duplicate stage '{}'", stage.name())));
            }
        }

        if let Some(temp) = &self.temp {
            if !self.schema.fields.iter().any(|f| f.name == temp.field) {
                return Err(self.invalid(format!("temp directory field '{}' is not in the schema", temp.field)));
            }
        }

        self.check_patterns()?;

        Ok(Pipeline {
            name: self.name,
            schema: self.schema,
            stages: self.stages,
            temp: self.temp,
        })
    }

    fn check_patterns(&self) -> Result<(), ConfigError> {
        if let Some(first) = self.stages.first() {
            if let Some(input) = first.input() {
                return Err(self.invalid(format!(
                    "first stage '{}' reads '{input}' which no stage writes",
                    first.name()
                )));
            }
        }

        for pair in self.stages.windows(2) {
            let (producer, consumer) = (&pair[0], &pair[1]);
            if producer.output() != consumer.input() {
                return Err(self.invalid(format!(
                    "stage '{}' writes {} but stage '{}' reads {}",
                    producer.name(),
                    describe(producer.output()),
                    consumer.name(),
                    describe(consumer.input()),
                )));
            }
        }

        let declared = self
            .stages
            .iter()
            .flat_map(|stage| stage.input().into_iter().chain(stage.output()));
        for pattern in declared {
            match &self.temp {
                None => {
                    return Err(self.invalid(format!(
                        "'{pattern}' is declared but the pipeline has no temp namespace"
                    )))
                }
                Some(temp) if !temp.cleanup.covers(pattern) => {
                    return Err(self.invalid(format!(
                        "clean-up pattern '{}' does not cover '{pattern}'",
                        temp.cleanup
                    )))
                }
                Some(_) => {}
            }
        }

        Ok(())
    }

    fn invalid(&self, message: impl Into<String>) -> ConfigError {
        ConfigError::invalid_pipeline(self.name, message)
    }
}

fn describe(pattern: Option<&FilePattern>) -> String {
    pattern.map_or_else(|| "nothing".to_string(), |p| format!("'{p}'"))
}
