//! Execution stage: carries out the planned subtasks in order.

use super::StageBody;
use crate::context::ExecutionContext;
use crate::errors::StageError;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;

/// Runs the planned subtasks sequentially and records per-subtask outcomes.
///
/// Requires `decomposition_result` and `analysis_result`. Subtasks whose
/// analysis is missing are not executed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionStage;

#[async_trait]
impl StageBody for ExecutionStage {
    async fn run(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<HashMap<String, serde_json::Value>, StageError> {
        let decomposition = ctx.require("decomposition_result")?;
        let analysis = ctx.require("analysis_result")?;

        let subtasks = decomposition
            .get("subtasks")
            .and_then(serde_json::Value::as_array)
            .cloned()
            .unwrap_or_default();
        let analyses = analysis
            .get("subtask_analyses")
            .and_then(serde_json::Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut subtask_results = Vec::new();
        let mut total_minutes = 0_u64;
        for (subtask, subtask_analysis) in subtasks.iter().zip(analyses.iter()) {
            let id = subtask
                .get("id")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown");
            let estimated_minutes = subtask
                .get("estimated_minutes")
                .and_then(serde_json::Value::as_u64)
                .unwrap_or(0);
            let dependencies_met = subtask_analysis
                .get("dependencies_met")
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false);
            if !dependencies_met {
                return Err(StageError::internal(format!(
                    "subtask '{id}' has unmet dependencies"
                )));
            }

            // TODO: dispatch to a real executor instead of echoing the plan.
            let now = Utc::now().to_rfc3339();
            total_minutes += estimated_minutes;
            subtask_results.push(json!({
                "subtask_id": id,
                "status": "completed",
                "started_at": now,
                "finished_at": now,
                "output": format!("output of {id}"),
                "metrics": {
                    "estimated_minutes": estimated_minutes,
                    "memory_mb": 800,
                    "cpu_cores": 0.8,
                },
            }));
        }

        let mut result = HashMap::new();
        result.insert("subtask_results".to_string(), json!(subtask_results));
        result.insert("total_execution_minutes".to_string(), json!(total_minutes));
        result.insert("overall_status".to_string(), json!("completed"));

        Ok(result)
    }

    fn running_note(&self) -> String {
        "executing subtasks".to_string()
    }

    fn completed_note(&self) -> String {
        "subtask execution complete".to_string()
    }
}
