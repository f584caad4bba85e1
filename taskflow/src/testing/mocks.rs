//! Mock stage bodies for exercising the coordinator.

use crate::context::ExecutionContext;
use crate::errors::StageError;
use crate::stages::StageBody;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

/// A body that records calls and returns a configurable outcome.
#[derive(Debug)]
pub struct MockBody {
    outcome: Mutex<Result<HashMap<String, serde_json::Value>, StageError>>,
    call_count: Mutex<usize>,
    seen_keys: Mutex<Vec<Vec<String>>>,
}

impl MockBody {
    /// Creates a mock that succeeds with an empty result.
    #[must_use]
    pub fn succeeding() -> Self {
        Self {
            outcome: Mutex::new(Ok(HashMap::new())),
            call_count: Mutex::new(0),
            seen_keys: Mutex::new(Vec::new()),
        }
    }

    /// Creates a mock that succeeds with the given result data.
    #[must_use]
    pub fn with_data(data: HashMap<String, serde_json::Value>) -> Self {
        let mock = Self::succeeding();
        *mock.outcome.lock() = Ok(data);
        mock
    }

    /// Creates a mock that fails with the given error.
    #[must_use]
    pub fn failing(error: StageError) -> Self {
        let mock = Self::succeeding();
        *mock.outcome.lock() = Err(error);
        mock
    }

    /// Replaces the outcome for subsequent calls.
    pub fn set_outcome(
        &self,
        outcome: Result<HashMap<String, serde_json::Value>, StageError>,
    ) {
        *self.outcome.lock() = outcome;
    }

    /// Returns the number of times the body was run.
    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.call_count.lock()
    }

    /// Returns the sorted context keys observed on each call.
    #[must_use]
    pub fn seen_keys(&self) -> Vec<Vec<String>> {
        self.seen_keys.lock().clone()
    }
}

#[async_trait]
impl StageBody for MockBody {
    async fn run(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<HashMap<String, serde_json::Value>, StageError> {
        *self.call_count.lock() += 1;
        let mut keys = ctx.keys();
        keys.sort();
        self.seen_keys.lock().push(keys);
        self.outcome.lock().clone()
    }
}

/// A body that always fails with an internal error.
#[derive(Debug, Clone)]
pub struct FailingBody {
    message: String,
}

impl FailingBody {
    /// Creates a failing body with the given error message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl StageBody for FailingBody {
    async fn run(
        &self,
        _ctx: &ExecutionContext,
    ) -> Result<HashMap<String, serde_json::Value>, StageError> {
        Err(StageError::internal(self.message.clone()))
    }
}
