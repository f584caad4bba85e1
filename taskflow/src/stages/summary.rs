//! Summary stage: condenses the whole run into a report.

use super::StageBody;
use crate::context::ExecutionContext;
use crate::errors::StageError;
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;

/// Builds the final report from all five predecessor results.
///
/// Requires `reasoning_result`, `decomposition_result`, `analysis_result`,
/// `execution_result` and `evaluation_result`; being last in the registry
/// is what makes them all available.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryStage;

#[async_trait]
impl StageBody for SummaryStage {
    async fn run(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<HashMap<String, serde_json::Value>, StageError> {
        let reasoning = ctx.require("reasoning_result")?;
        let decomposition = ctx.require("decomposition_result")?;
        let analysis = ctx.require("analysis_result")?;
        let execution = ctx.require("execution_result")?;
        let evaluation = ctx.require("evaluation_result")?;

        let overall_metrics = evaluation
            .get("overall_metrics")
            .cloned()
            .unwrap_or_else(|| json!({}));

        let mut result = HashMap::new();
        result.insert(
            "execution_summary".to_string(),
            json!({
                "intent": reasoning.get("intent"),
                "total_tasks": decomposition.get("total_tasks"),
                "total_execution_minutes": execution.get("total_execution_minutes"),
                "overall_status": execution.get("overall_status"),
            }),
        );
        result.insert(
            "performance_summary".to_string(),
            json!({
                "success_rate": overall_metrics.get("average_success_rate"),
                "performance_score": overall_metrics.get("average_performance_score"),
                "quality_score": overall_metrics.get("average_quality_score"),
            }),
        );
        result.insert(
            "key_findings".to_string(),
            json!([
                format!(
                    "overall risk level was {}",
                    analysis
                        .get("overall_risk_level")
                        .and_then(serde_json::Value::as_str)
                        .unwrap_or("unknown")
                ),
                "all planned subtasks ran to completion",
            ]),
        );
        result.insert(
            "recommendations".to_string(),
            evaluation
                .get("recommendations")
                .cloned()
                .unwrap_or_else(|| json!([])),
        );
        result.insert(
            "next_steps".to_string(),
            json!(["review the subtask outputs", "schedule a follow-up run"]),
        );

        Ok(result)
    }

    fn running_note(&self) -> String {
        "generating summary".to_string()
    }

    fn completed_note(&self) -> String {
        "summary generation complete".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{result_key, RunIdentity};

    fn full_ctx() -> ExecutionContext {
        let mut ctx = ExecutionContext::new(RunIdentity::new(), HashMap::new());
        ctx.set(
            result_key("reasoning"),
            serde_json::json!({"intent": "task_execution"}),
        );
        ctx.set(
            result_key("decomposition"),
            serde_json::json!({"total_tasks": 2}),
        );
        ctx.set(
            result_key("analysis"),
            serde_json::json!({"overall_risk_level": "low"}),
        );
        ctx.set(
            result_key("execution"),
            serde_json::json!({"total_execution_minutes": 15, "overall_status": "completed"}),
        );
        ctx.set(
            result_key("evaluation"),
            serde_json::json!({
                "overall_metrics": {"average_success_rate": 0.95},
                "recommendations": ["batch related subtasks"],
            }),
        );
        ctx
    }

    #[tokio::test]
    async fn test_requires_every_predecessor() {
        let ctx = ExecutionContext::new(RunIdentity::new(), HashMap::new());
        let err = SummaryStage.run(&ctx).await.unwrap_err();
        assert_eq!(err.to_string(), "MissingDependency: reasoning_result");
    }

    #[tokio::test]
    async fn test_missing_late_predecessor() {
        let mut initial = full_ctx().to_dict();
        initial.remove("evaluation_result");
        let ctx = ExecutionContext::new(RunIdentity::new(), initial);

        let err = SummaryStage.run(&ctx).await.unwrap_err();
        assert_eq!(err.to_string(), "MissingDependency: evaluation_result");
    }

    #[tokio::test]
    async fn test_summary_pulls_from_all_predecessors() {
        let result = SummaryStage.run(&full_ctx()).await.unwrap();

        assert_eq!(
            result["execution_summary"]["overall_status"],
            serde_json::json!("completed")
        );
        assert_eq!(
            result["performance_summary"]["success_rate"],
            serde_json::json!(0.95)
        );
        assert_eq!(
            result["recommendations"],
            serde_json::json!(["batch related subtasks"])
        );
    }
}
