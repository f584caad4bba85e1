//! Coordinator construction with registration-time validation.

use super::PipelineCoordinator;
use crate::errors::PipelineValidationError;
use crate::events::{EventSink, NoOpEventSink};
use crate::stages::{
    AnalysisStage, DecompositionStage, EvaluationStage, ExecutionStage, ReasoningStage, Stage,
    StageBody, SummaryStage,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Builder for a validated [`PipelineCoordinator`].
///
/// Stages execute in registration order; there is no dependency graph.
pub struct CoordinatorBuilder {
    name: String,
    stages: Vec<Stage>,
    names: HashSet<String>,
    event_sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for CoordinatorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinatorBuilder")
            .field("name", &self.name)
            .field("stages", &self.stages)
            .field("names", &self.names)
            .field("event_sink", &"<dyn EventSink>")
            .finish()
    }
}

impl CoordinatorBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
            names: HashSet::new(),
            event_sink: Arc::new(NoOpEventSink),
        }
    }

    /// Registers a stage. Insertion order is execution order.
    ///
    /// # Errors
    ///
    /// Returns an error if a stage with the same name is already
    /// registered.
    pub fn stage(
        mut self,
        name: impl Into<String>,
        body: Arc<dyn StageBody>,
    ) -> Result<Self, PipelineValidationError> {
        let name = name.into();
        if !self.names.insert(name.clone()) {
            return Err(
                PipelineValidationError::new(format!("duplicate stage name '{name}'"))
                    .with_stages(vec![name]),
            );
        }

        self.stages.push(Stage::new(name, body));
        Ok(self)
    }

    /// Registers the six built-in task stages in their canonical order:
    /// reasoning, decomposition, analysis, execution, evaluation, summary.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the six names is already registered.
    pub fn with_task_stages(self) -> Result<Self, PipelineValidationError> {
        self.stage("reasoning", Arc::new(ReasoningStage))?
            .stage("decomposition", Arc::new(DecompositionStage))?
            .stage("analysis", Arc::new(AnalysisStage))?
            .stage("execution", Arc::new(ExecutionStage))?
            .stage("evaluation", Arc::new(EvaluationStage))?
            .stage("summary", Arc::new(SummaryStage))
    }

    /// Sets the event sink the coordinator emits through.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
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

    /// Builds the coordinator.
    ///
    /// # Errors
    ///
    /// Returns an error if no stage is registered.
    pub fn build(self) -> Result<PipelineCoordinator, PipelineValidationError> {
        if self.stages.is_empty() {
            return Err(PipelineValidationError::new("pipeline has no stages"));
        }

        Ok(PipelineCoordinator::from_parts(
            self.name,
            self.stages,
            self.event_sink,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::NoOpBody;

    #[test]
    fn test_duplicate_stage_name_rejected() {
        let err = CoordinatorBuilder::new("task-run")
            .stage("reasoning", Arc::new(NoOpBody))
            .unwrap()
            .stage("reasoning", Arc::new(NoOpBody))
            .unwrap_err();

        assert_eq!(err.to_string(), "duplicate stage name 'reasoning'");
        assert_eq!(err.stages, vec!["reasoning".to_string()]);
    }

    #[test]
    fn test_empty_pipeline_rejected() {
        let err = CoordinatorBuilder::new("task-run").build().unwrap_err();
        assert_eq!(err.to_string(), "pipeline has no stages");
    }

    #[test]
    fn test_with_task_stages_registers_canonical_order() {
        let coordinator = CoordinatorBuilder::new("task-run")
            .with_task_stages()
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(
            coordinator.stage_names(),
            vec![
                "reasoning",
                "decomposition",
                "analysis",
                "execution",
                "evaluation",
                "summary",
            ]
        );
    }
}
