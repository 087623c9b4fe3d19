//! Records of finished runs.

use super::RunState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happened in one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    /// Stage name.
    pub name: String,
    /// The logged command line.
    pub command: String,
    /// Exit code of the external process.
    pub exit_code: i32,
    /// When the process was started.
    pub started_at: DateTime<Utc>,
    /// When the process exited.
    pub ended_at: DateTime<Utc>,
}

impl StageRecord {
    /// Duration of the stage in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.ended_at - self.started_at).num_milliseconds()
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Run identifier, also attached to every log line of the run.
    pub run_id: Uuid,
    /// Tool name.
    pub tool: String,
    /// Final state.
    pub state: RunState,
    /// Stages in execution order.
    pub stages: Vec<StageRecord>,
    /// Number of temporary files removed during cleanup.
    pub removed_files: usize,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run ended.
    pub ended_at: DateTime<Utc>,
}

impl RunReport {
    /// Starts an empty report.
    #[must_use]
    pub fn new(run_id: Uuid, tool: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            run_id,
            tool: tool.into(),
            state: RunState::Validating,
            stages: Vec::new(),
            removed_files: 0,
            started_at: now,
            ended_at: now,
        }
    }

    /// Names of the stages that ran.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }

    /// Marks the report finished.
    pub fn finish(&mut self, state: RunState) {
        self.state = state;
        self.ended_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_finish() {
        let mut report = RunReport::new(Uuid::new_v4(), "lasinfo");
        let started = Utc::now();
        report.stages.push(StageRecord {
            name: "lasinfo".to_string(),
            command: "\"lasinfo\" -i \"a.las\"".to_string(),
            exit_code: 0,
            started_at: started,
            ended_at: started,
        });
        report.finish(RunState::Done);

        assert_eq!(report.state, RunState::Done);
        assert_eq!(report.stage_names(), vec!["lasinfo"]);
        assert_eq!(report.stages[0].duration_ms(), 0);
        assert!(report.ended_at >= report.started_at);
    }

    #[test]
    fn test_report_serializes() {
        let report = RunReport::new(Uuid::new_v4(), "lasgrid");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["tool"], "lasgrid");
        assert_eq!(json["state"], "validating");
    }
}
