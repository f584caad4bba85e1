//! Run results returned by the coordinator.

use crate::context::RunIdentity;
use crate::core::StageStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-stage entry in a run result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    /// The terminal status the stage reached during the run.
    pub status: StageStatus,

    /// The result mapping, absent when the stage failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<HashMap<String, serde_json::Value>>,
}

impl StageReport {
    /// Creates a completed report with a result.
    #[must_use]
    pub const fn completed(result: HashMap<String, serde_json::Value>) -> Self {
        Self {
            status: StageStatus::Completed,
            result: Some(result),
        }
    }

    /// Creates a failed report with no result.
    #[must_use]
    pub const fn failed() -> Self {
        Self {
            status: StageStatus::Error,
            result: None,
        }
    }
}

/// The outcome of one coordinator run.
///
/// Contains a report for every stage that ran, in execution order. A run
/// halted by a failure carries reports only for the stages up to and
/// including the failing one, plus the top-level `error` text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// The coordinator name.
    pub pipeline: String,

    /// The identity of this run.
    pub identity: RunIdentity,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: f64,

    /// Reports keyed by stage name.
    pub stages: HashMap<String, StageReport>,

    /// The order reports were recorded in.
    order: Vec<String>,

    /// Top-level error when the run halted early.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunResult {
    pub(crate) fn new(
        pipeline: impl Into<String>,
        identity: RunIdentity,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            pipeline: pipeline.into(),
            identity,
            started_at,
            duration_ms: 0.0,
            stages: HashMap::new(),
            order: Vec::new(),
            error: None,
        }
    }

    pub(crate) fn record(&mut self, name: impl Into<String>, report: StageReport) {
        let name = name.into();
        self.order.push(name.clone());
        self.stages.insert(name, report);
    }

    /// Returns the report for a stage, if it ran.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&StageReport> {
        self.stages.get(name)
    }

    /// Returns the number of recorded stage reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no stage was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns true if the run completed without a failure.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    /// Returns the recorded stage names in execution order.
    #[must_use]
    pub fn stage_names(&self) -> &[String] {
        &self.order
    }

    /// Iterates over reports in execution order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StageReport)> {
        self.order
            .iter()
            .filter_map(|name| self.stages.get(name).map(|report| (name.as_str(), report)))
    }

    /// Converts the result to the caller-facing dictionary shape:
    /// stage name → `{status, result}`, plus a top-level `"error"` entry
    /// when the run halted early.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        for (name, report) in self.iter() {
            map.insert(
                name.to_string(),
                serde_json::json!({
                    "status": report.status.to_string(),
                    "result": report.result,
                }),
            );
        }
        if let Some(ref error) = self.error {
            map.insert("error".to_string(), serde_json::json!(error));
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_preserves_order() {
        let mut result = RunResult::new("task-run", RunIdentity::new(), Utc::now());
        result.record("reasoning", StageReport::completed(HashMap::new()));
        result.record("decomposition", StageReport::failed());

        assert_eq!(result.len(), 2);
        assert_eq!(
            result.stage_names(),
            &["reasoning".to_string(), "decomposition".to_string()]
        );

        let names: Vec<&str> = result.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["reasoning", "decomposition"]);
    }

    #[test]
    fn test_to_dict_carries_error() {
        let mut result = RunResult::new("task-run", RunIdentity::new(), Utc::now());
        result.record("reasoning", StageReport::failed());
        result.error = Some("MissingDependency: messages".to_string());

        let dict = result.to_dict();
        assert_eq!(
            dict.get("reasoning"),
            Some(&serde_json::json!({"status": "error", "result": null}))
        );
        assert_eq!(
            dict.get("error"),
            Some(&serde_json::json!("MissingDependency: messages"))
        );
        assert!(!result.succeeded());
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut result = RunResult::new("task-run", RunIdentity::new(), Utc::now());
        let mut data = HashMap::new();
        data.insert("intent".to_string(), serde_json::json!("task_execution"));
        result.record("reasoning", StageReport::completed(data));

        let json = serde_json::to_string(&result).unwrap();
        let decoded: RunResult = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.pipeline, "task-run");
        assert_eq!(decoded.stage_names(), result.stage_names());
        assert!(decoded.succeeded());
    }
}
