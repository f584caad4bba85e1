//! Decomposition stage: splits the interpreted task into subtasks.

use super::StageBody;
use crate::context::ExecutionContext;
use crate::errors::StageError;
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;

/// Breaks the interpreted task into an ordered subtask list.
///
/// Requires `reasoning_result`. Subtask dependencies reference earlier
/// subtasks only; the list is already in execution order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecompositionStage;

#[async_trait]
impl StageBody for DecompositionStage {
    async fn run(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<HashMap<String, serde_json::Value>, StageError> {
        let reasoning = ctx.require("reasoning_result")?;
        let input = reasoning
            .get("input")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("the requested task");

        let subtasks = json!([
            {
                "id": "subtask-1",
                "title": "Prepare inputs",
                "description": format!("Collect the data needed for: {input}"),
                "dependencies": [],
                "estimated_minutes": 5,
            },
            {
                "id": "subtask-2",
                "title": "Carry out the task",
                "description": format!("Perform the main work for: {input}"),
                "dependencies": ["subtask-1"],
                "estimated_minutes": 10,
            },
        ]);

        let mut result = HashMap::new();
        result.insert("subtasks".to_string(), subtasks);
        result.insert("total_tasks".to_string(), json!(2));
        result.insert("estimated_total_minutes".to_string(), json!(15));

        Ok(result)
    }

    fn running_note(&self) -> String {
        "decomposing task".to_string()
    }

    fn completed_note(&self) -> String {
        "task decomposition complete".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{result_key, RunIdentity};

    #[tokio::test]
    async fn test_requires_reasoning_result() {
        let ctx = ExecutionContext::new(RunIdentity::new(), HashMap::new());
        let err = DecompositionStage.run(&ctx).await.unwrap_err();
        assert_eq!(err.to_string(), "MissingDependency: reasoning_result");
    }

    #[tokio::test]
    async fn test_produces_ordered_subtasks() {
        let mut ctx = ExecutionContext::new(RunIdentity::new(), HashMap::new());
        ctx.set(
            result_key("reasoning"),
            serde_json::json!({"intent": "task_execution", "input": "deploy the service"}),
        );

        let result = DecompositionStage.run(&ctx).await.unwrap();
        assert_eq!(result.get("total_tasks"), Some(&serde_json::json!(2)));

        let subtasks = result["subtasks"].as_array().unwrap();
        assert_eq!(subtasks[0]["dependencies"], serde_json::json!([]));
        assert_eq!(subtasks[1]["dependencies"], serde_json::json!(["subtask-1"]));
    }
}
