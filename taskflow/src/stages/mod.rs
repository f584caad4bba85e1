//! Stage bodies and the stateful stage wrapper.
//!
//! A [`StageBody`] holds the pluggable logic: it reads accumulated values
//! from the execution context and returns a single result mapping, or
//! fails. The [`Stage`] wrapper owns the live
//! `{status, details, result, error}` record and drives the
//! `pending → running → completed | error` state machine around the body.

mod analysis;
mod decomposition;
mod evaluation;
mod execution;
mod reasoning;
mod summary;

pub use analysis::AnalysisStage;
pub use decomposition::DecompositionStage;
pub use evaluation::EvaluationStage;
pub use execution::ExecutionStage;
pub use reasoning::ReasoningStage;
pub use summary::SummaryStage;

use crate::context::ExecutionContext;
use crate::core::{StageStatus, StatusSnapshot};
use crate::errors::StageError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Trait for pluggable stage logic.
///
/// Bodies may read any existing context key (registration order is the
/// only dependency mechanism) and produce exactly one result mapping;
/// the coordinator merges it back under `"<stage>_result"`. Bodies never
/// retry internally.
#[async_trait]
pub trait StageBody: Send + Sync + Debug {
    /// Executes the body against the current context.
    async fn run(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<HashMap<String, serde_json::Value>, StageError>;

    /// Progress note recorded when the stage enters `running`.
    fn running_note(&self) -> String {
        "in progress".to_string()
    }

    /// Progress note recorded when the stage completes.
    fn completed_note(&self) -> String {
        "finished".to_string()
    }
}

/// A stage body backed by a plain function.
pub struct FnBody<F>
where
    F: Fn(&ExecutionContext) -> Result<HashMap<String, serde_json::Value>, StageError>
        + Send
        + Sync,
{
    func: F,
}

impl<F> FnBody<F>
where
    F: Fn(&ExecutionContext) -> Result<HashMap<String, serde_json::Value>, StageError>
        + Send
        + Sync,
{
    /// Creates a new function-based body.
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Debug for FnBody<F>
where
    F: Fn(&ExecutionContext) -> Result<HashMap<String, serde_json::Value>, StageError>
        + Send
        + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnBody").finish()
    }
}

#[async_trait]
impl<F> StageBody for FnBody<F>
where
    F: Fn(&ExecutionContext) -> Result<HashMap<String, serde_json::Value>, StageError>
        + Send
        + Sync,
{
    async fn run(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<HashMap<String, serde_json::Value>, StageError> {
        (self.func)(ctx)
    }
}

/// A body that returns an empty result.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpBody;

#[async_trait]
impl StageBody for NoOpBody {
    async fn run(
        &self,
        _ctx: &ExecutionContext,
    ) -> Result<HashMap<String, serde_json::Value>, StageError> {
        Ok(HashMap::new())
    }
}

/// The live state record backing a stage.
#[derive(Debug, Default)]
struct StageRecord {
    status: StageStatus,
    details: Option<String>,
    result: Option<HashMap<String, serde_json::Value>>,
    error: Option<String>,
}

/// A named unit of work with a live status record.
///
/// A stage is long-lived and may be reused across runs; each `execute`
/// overwrites the previous record rather than merging into it. The record
/// keeps `result` and `error` mutually exclusive. Stages are not
/// synchronized for concurrent reuse by simultaneous runs.
#[derive(Debug)]
pub struct Stage {
    name: String,
    body: Arc<dyn StageBody>,
    record: RwLock<StageRecord>,
}

impl Stage {
    /// Creates a stage wrapping a body, starting in `pending`.
    #[must_use]
    pub fn new(name: impl Into<String>, body: Arc<dyn StageBody>) -> Self {
        Self {
            name: name.into(),
            body,
            record: RwLock::new(StageRecord::default()),
        }
    }

    /// Returns the stage name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> StageStatus {
        self.record.read().status
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> StatusSnapshot {
        let record = self.record.read();
        StatusSnapshot {
            status: record.status,
            details: record.details.clone(),
            result: record.result.clone(),
            error: record.error.clone(),
        }
    }

    /// Runs the body, recording status transitions.
    ///
    /// On entry the record is reset to `running` with the body's progress
    /// note. On success the result is recorded and returned; on failure
    /// the error is recorded (details left as last set) and re-raised so
    /// the coordinator halts the run.
    pub(crate) async fn execute(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<HashMap<String, serde_json::Value>, StageError> {
        {
            let mut record = self.record.write();
            *record = StageRecord {
                status: StageStatus::Running,
                details: Some(self.body.running_note()),
                result: None,
                error: None,
            };
        }

        match self.body.run(ctx).await {
            Ok(result) => {
                let mut record = self.record.write();
                record.status = StageStatus::Completed;
                record.details = Some(self.body.completed_note());
                record.result = Some(result.clone());
                Ok(result)
            }
            Err(err) => {
                let mut record = self.record.write();
                record.status = StageStatus::Error;
                record.error = Some(err.to_string());
                Err(err)
            }
        }
    }
}
