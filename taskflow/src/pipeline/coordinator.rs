//! The pipeline coordinator: drives stages in order, stops on first failure.

use super::{CoordinatorBuilder, RunResult, StageReport};
use crate::context::{result_key, ExecutionContext, RunIdentity};
use crate::core::StatusSnapshot;
use crate::errors::PipelineError;
use crate::events::EventSink;
use crate::stages::Stage;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Executes an ordered registry of stages against an accumulating context.
///
/// The registry is fixed at construction: registration order is execution
/// order and the only dependency mechanism. Each stage's result is merged
/// back into the context under `"<name>_result"` before the next stage
/// runs; the first failure halts the run and later stages are left
/// untouched (typically `pending`).
///
/// A coordinator owns its stages; their live status is readable through
/// [`PipelineCoordinator::get_stage_status`] and
/// [`PipelineCoordinator::get_all_status`]. Concurrent `run_all` calls on
/// one coordinator are not synchronized — callers needing concurrent
/// independent runs must build a coordinator per run.
pub struct PipelineCoordinator {
    name: String,
    stages: Vec<Stage>,
    index: HashMap<String, usize>,
    event_sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for PipelineCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineCoordinator")
            .field("name", &self.name)
            .field("stages", &self.stage_names())
            .finish()
    }
}

impl PipelineCoordinator {
    /// Creates a builder for a coordinator.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> CoordinatorBuilder {
        CoordinatorBuilder::new(name)
    }

    pub(crate) fn from_parts(
        name: String,
        stages: Vec<Stage>,
        event_sink: Arc<dyn EventSink>,
    ) -> Self {
        let index = stages
            .iter()
            .enumerate()
            .map(|(i, stage)| (stage.name().to_string(), i))
            .collect();

        Self {
            name,
            stages,
            index,
            event_sink,
        }
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of registered stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Returns the registered stage names in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(Stage::name).collect()
    }

    /// Runs every registered stage in registration order.
    ///
    /// The caller's map seeds a fresh execution context; taking it by
    /// value means later caller-side mutations cannot reach the run. On
    /// success each stage's result lands in the context under
    /// `"<name>_result"` and in the returned report map. On the first
    /// failure the run halts: the failing stage is reported with status
    /// `error` and a `None` result, the returned result carries the error
    /// text, and the remaining stages do not run.
    pub async fn run_all(&self, initial: HashMap<String, serde_json::Value>) -> RunResult {
        let identity = RunIdentity::new();
        let started_at = Utc::now();
        let started = Instant::now();

        let mut ctx = ExecutionContext::new(identity.clone(), initial);
        let mut result = RunResult::new(self.name.clone(), identity.clone(), started_at);

        tracing::info!(
            pipeline = %self.name,
            run_id = %identity.run_id,
            stages = self.stages.len(),
            "pipeline run started"
        );

        for stage in &self.stages {
            self.event_sink.try_emit(
                "stage.started",
                Some(serde_json::json!({
                    "pipeline": self.name,
                    "run_id": identity.run_id,
                    "stage": stage.name(),
                })),
            );

            let stage_started = Instant::now();
            match stage.execute(&ctx).await {
                Ok(data) => {
                    let duration_ms = stage_started.elapsed().as_secs_f64() * 1000.0;
                    ctx.set(
                        result_key(stage.name()),
                        serde_json::Value::Object(data.clone().into_iter().collect()),
                    );
                    result.record(stage.name(), StageReport::completed(data));

                    tracing::info!(
                        pipeline = %self.name,
                        stage = stage.name(),
                        duration_ms,
                        "stage completed"
                    );
                    self.event_sink.try_emit(
                        "stage.completed",
                        Some(serde_json::json!({
                            "pipeline": self.name,
                            "run_id": identity.run_id,
                            "stage": stage.name(),
                            "duration_ms": duration_ms,
                        })),
                    );
                }
                Err(err) => {
                    let error = err.to_string();
                    result.record(stage.name(), StageReport::failed());
                    result.error = Some(error.clone());

                    tracing::warn!(
                        pipeline = %self.name,
                        stage = stage.name(),
                        error = %error,
                        "stage failed, halting run"
                    );
                    self.event_sink.try_emit(
                        "stage.failed",
                        Some(serde_json::json!({
                            "pipeline": self.name,
                            "run_id": identity.run_id,
                            "stage": stage.name(),
                            "error": error,
                        })),
                    );
                    break;
                }
            }
        }

        result.duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        let event_type = if result.succeeded() {
            "pipeline.completed"
        } else {
            "pipeline.failed"
        };
        self.event_sink.try_emit(
            event_type,
            Some(serde_json::json!({
                "pipeline": self.name,
                "run_id": identity.run_id,
                "duration_ms": result.duration_ms,
                "stages_recorded": result.len(),
                "error": result.error,
            })),
        );
        tracing::info!(
            pipeline = %self.name,
            run_id = %identity.run_id,
            duration_ms = result.duration_ms,
            success = result.succeeded(),
            "pipeline run finished"
        );

        result
    }

    /// Returns the named stage's live status snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::StageNotFound`] for an unregistered name.
    pub fn get_stage_status(&self, name: &str) -> Result<StatusSnapshot, PipelineError> {
        self.index
            .get(name)
            .and_then(|&i| self.stages.get(i))
            .map(Stage::snapshot)
            .ok_or_else(|| PipelineError::stage_not_found(name))
    }

    /// Returns live snapshots for every registered stage, taken at call
    /// time from the stage objects (not from a stored run result).
    #[must_use]
    pub fn get_all_status(&self) -> HashMap<String, StatusSnapshot> {
        self.stages
            .iter()
            .map(|stage| (stage.name().to_string(), stage.snapshot()))
            .collect()
    }
}
