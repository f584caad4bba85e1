//! Runtime helpers for driving coordinator runs.

use super::{PipelineCoordinator, RunResult};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::timeout;

/// Result of a deadline-bounded run.
#[derive(Debug)]
pub enum TimedRun {
    /// The run finished within the deadline.
    Finished(RunResult),
    /// The deadline elapsed first. The run was abandoned and its context
    /// discarded; individual stages are not signalled.
    TimedOut,
}

impl TimedRun {
    /// Returns true if the run finished within the deadline.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }

    /// Unwraps the run result, if the run finished.
    #[must_use]
    pub fn into_result(self) -> Option<RunResult> {
        match self {
            Self::Finished(result) => Some(result),
            Self::TimedOut => None,
        }
    }
}

/// Runs the whole pipeline under an overall deadline.
///
/// The coordinator defines no per-stage cancellation primitive; the
/// deadline bounds the entire run. On timeout the in-flight run is
/// dropped at its next await point and its context is discarded. Stage
/// status records may be left mid-transition (e.g. `running`), so a
/// coordinator abandoned this way should not be reused for status
/// reporting.
pub async fn run_with_deadline(
    coordinator: &PipelineCoordinator,
    initial: HashMap<String, serde_json::Value>,
    deadline: Duration,
) -> TimedRun {
    match timeout(deadline, coordinator.run_all(initial)).await {
        Ok(result) => TimedRun::Finished(result),
        Err(_) => TimedRun::TimedOut,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ExecutionContext;
    use crate::errors::StageError;
    use crate::stages::{NoOpBody, StageBody};
    use async_trait::async_trait;
    use std::sync::Arc;

    #[derive(Debug)]
    struct SleepyBody {
        delay: Duration,
    }

    #[async_trait]
    impl StageBody for SleepyBody {
        async fn run(
            &self,
            _ctx: &ExecutionContext,
        ) -> Result<HashMap<String, serde_json::Value>, StageError> {
            tokio::time::sleep(self.delay).await;
            Ok(HashMap::new())
        }
    }

    #[tokio::test]
    async fn test_fast_run_finishes() {
        let coordinator = PipelineCoordinator::builder("task-run")
            .stage("quick", Arc::new(NoOpBody))
            .unwrap()
            .build()
            .unwrap();

        let timed = run_with_deadline(&coordinator, HashMap::new(), Duration::from_secs(5)).await;
        assert!(timed.is_finished());
        assert!(timed.into_result().unwrap().succeeded());
    }

    #[tokio::test]
    async fn test_slow_run_times_out() {
        let coordinator = PipelineCoordinator::builder("task-run")
            .stage(
                "slow",
                Arc::new(SleepyBody {
                    delay: Duration::from_secs(60),
                }),
            )
            .unwrap()
            .build()
            .unwrap();

        let timed =
            run_with_deadline(&coordinator, HashMap::new(), Duration::from_millis(10)).await;
        assert!(!timed.is_finished());
        assert!(timed.into_result().is_none());
    }
}
