//! Analysis stage: checks execution conditions for each subtask.

use super::StageBody;
use crate::context::ExecutionContext;
use crate::errors::StageError;
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;

/// Analyzes readiness, resource needs and risks for every subtask.
///
/// Requires `decomposition_result`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisStage;

#[async_trait]
impl StageBody for AnalysisStage {
    async fn run(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<HashMap<String, serde_json::Value>, StageError> {
        let decomposition = ctx.require("decomposition_result")?;
        let subtasks = decomposition
            .get("subtasks")
            .and_then(serde_json::Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut analyses = Vec::with_capacity(subtasks.len());
        for subtask in &subtasks {
            let id = subtask
                .get("id")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown");

            analyses.push(json!({
                "subtask_id": id,
                "dependencies_met": true,
                "required_resources": {
                    "memory_mb": 1024,
                    "cpu_cores": 1,
                    "storage_mb": 100,
                },
                "potential_risks": ["missing input data", "timeout"],
                "risk_level": "low",
            }));
        }

        let count = subtasks.len() as u64;
        let mut result = HashMap::new();
        result.insert("subtask_analyses".to_string(), json!(analyses));
        result.insert("overall_risk_level".to_string(), json!("low"));
        result.insert(
            "resource_requirements".to_string(),
            json!({
                "total_memory_mb": 1024 * count,
                "total_cpu_cores": count,
                "total_storage_mb": 100 * count,
            }),
        );

        Ok(result)
    }

    fn running_note(&self) -> String {
        "analyzing execution conditions".to_string()
    }

    fn completed_note(&self) -> String {
        "execution condition analysis complete".to_string()
    }
}
