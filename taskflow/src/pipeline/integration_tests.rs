//! End-to-end tests driving full pipelines through the public surface.

use crate::core::StageStatus;
use crate::events::CollectingEventSink;
use crate::pipeline::PipelineCoordinator;
use crate::stages::{DecompositionStage, ReasoningStage};
use crate::testing::FailingBody;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::sync::Arc;

fn messages_context(content: &str) -> HashMap<String, serde_json::Value> {
    let mut initial = HashMap::new();
    initial.insert(
        "messages".to_string(),
        serde_json::json!([{"role": "user", "content": content}]),
    );
    initial
}

#[tokio::test]
async fn scenario_a_two_stages_succeed() {
    let coordinator = PipelineCoordinator::builder("task-run")
        .stage("reasoning", Arc::new(ReasoningStage))
        .unwrap()
        .stage("decomposition", Arc::new(DecompositionStage))
        .unwrap()
        .build()
        .unwrap();

    let result = coordinator.run_all(messages_context("hi")).await;

    assert!(result.succeeded());
    assert_eq!(result.len(), 2);
    assert_eq!(
        result.get("reasoning").unwrap().status,
        StageStatus::Completed
    );
    assert_eq!(
        result.get("decomposition").unwrap().status,
        StageStatus::Completed
    );
    assert!(result.get("reasoning").unwrap().result.is_some());
    assert!(result.get("decomposition").unwrap().result.is_some());
}

#[tokio::test]
async fn scenario_b_missing_seed_key_halts_the_run() {
    let coordinator = PipelineCoordinator::builder("task-run")
        .stage("reasoning", Arc::new(ReasoningStage))
        .unwrap()
        .stage("decomposition", Arc::new(DecompositionStage))
        .unwrap()
        .build()
        .unwrap();

    let result = coordinator.run_all(HashMap::new()).await;

    assert_eq!(result.len(), 1);
    assert_eq!(result.get("reasoning").unwrap().status, StageStatus::Error);
    assert!(result.get("reasoning").unwrap().result.is_none());
    assert!(result.get("decomposition").is_none());
    assert_eq!(result.error.as_deref(), Some("MissingDependency: messages"));

    // The un-run stage keeps its pending status.
    assert_eq!(
        coordinator
            .get_stage_status("decomposition")
            .unwrap()
            .status,
        StageStatus::Pending
    );
}

#[tokio::test]
async fn full_task_run_accumulates_every_result() {
    let sink = Arc::new(CollectingEventSink::new());
    let coordinator = PipelineCoordinator::builder("task-run")
        .with_event_sink(sink.clone())
        .with_task_stages()
        .unwrap()
        .build()
        .unwrap();

    let result = coordinator
        .run_all(messages_context("deploy the service"))
        .await;

    assert!(result.succeeded(), "error: {:?}", result.error);
    assert_eq!(
        result.stage_names(),
        &[
            "reasoning".to_string(),
            "decomposition".to_string(),
            "analysis".to_string(),
            "execution".to_string(),
            "evaluation".to_string(),
            "summary".to_string(),
        ]
    );

    // Every stage completed, produced a result, and the summary stitched
    // the predecessors together.
    for (_, report) in result.iter() {
        assert_eq!(report.status, StageStatus::Completed);
        assert!(report.result.is_some());
    }
    let summary = result.get("summary").unwrap().result.as_ref().unwrap();
    assert_eq!(
        summary["execution_summary"]["overall_status"],
        serde_json::json!("completed")
    );

    // Two events per stage plus the pipeline-level completion.
    assert_eq!(sink.event_types().len(), 13);
    assert_eq!(
        sink.event_types().last(),
        Some(&"pipeline.completed".to_string())
    );
}

#[tokio::test]
async fn failure_mid_run_is_reported_per_stage_and_top_level() {
    let coordinator = PipelineCoordinator::builder("task-run")
        .stage("reasoning", Arc::new(ReasoningStage))
        .unwrap()
        .stage("decomposition", Arc::new(FailingBody::new("planner crashed")))
        .unwrap()
        .stage("analysis", Arc::new(crate::stages::AnalysisStage))
        .unwrap()
        .build()
        .unwrap();

    let result = coordinator.run_all(messages_context("hi")).await;

    assert_eq!(result.len(), 2);
    assert_eq!(result.error.as_deref(), Some("planner crashed"));

    let dict = result.to_dict();
    assert_eq!(
        dict.get("decomposition"),
        Some(&serde_json::json!({"status": "error", "result": null}))
    );
    assert!(dict.contains_key("reasoning"));
    assert!(!dict.contains_key("analysis"));
}

#[tokio::test]
async fn caller_mutations_after_run_all_do_not_leak_in() {
    let coordinator = PipelineCoordinator::builder("task-run")
        .stage("reasoning", Arc::new(ReasoningStage))
        .unwrap()
        .build()
        .unwrap();

    let mut initial = messages_context("original request");
    let result = coordinator.run_all(initial.clone()).await;

    // Mutating the caller's map afterwards cannot affect the finished run.
    initial.insert("messages".to_string(), serde_json::json!([]));

    let reasoning = result.get("reasoning").unwrap().result.as_ref().unwrap();
    assert_eq!(
        reasoning.get("input"),
        Some(&serde_json::json!("original request"))
    );
}

#[tokio::test]
async fn status_snapshots_follow_a_run() {
    let coordinator = PipelineCoordinator::builder("task-run")
        .with_task_stages()
        .unwrap()
        .build()
        .unwrap();

    // Before any run, everything is pending.
    for (_, snapshot) in coordinator.get_all_status() {
        assert_eq!(snapshot.status, StageStatus::Pending);
        assert!(snapshot.details.is_none());
    }

    coordinator.run_all(messages_context("hi")).await;

    let statuses = coordinator.get_all_status();
    assert_eq!(statuses.len(), 6);
    assert_eq!(statuses["reasoning"].status, StageStatus::Completed);
    assert_eq!(
        statuses["reasoning"].details.as_deref(),
        Some("user input analysis complete")
    );
    assert_eq!(statuses["summary"].status, StageStatus::Completed);
}
