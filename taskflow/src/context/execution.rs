//! The run-scoped execution context threaded through stages.

use super::RunIdentity;
use crate::errors::StageError;
use std::collections::HashMap;

/// Derives the context key a stage's result is stored under.
#[must_use]
pub fn result_key(stage_name: &str) -> String {
    format!("{stage_name}_result")
}

/// Mutable key/value store owned by the coordinator for the lifetime of
/// one run.
///
/// Stages read accumulated values through a shared reference; only the
/// coordinator writes, storing each stage's result under
/// `"<stage>_result"`. The store is seeded from the caller's initial
/// values and discarded when the run returns. It is never shared across
/// concurrent runs.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    identity: RunIdentity,
    data: HashMap<String, serde_json::Value>,
}

impl ExecutionContext {
    /// Creates a context seeded with the caller's initial values.
    ///
    /// The map is taken by value: ownership moves into the run, so later
    /// mutations of the caller's data cannot reach a run in flight.
    #[must_use]
    pub fn new(identity: RunIdentity, initial: HashMap<String, serde_json::Value>) -> Self {
        Self {
            identity,
            data: initial,
        }
    }

    /// Returns the run identity.
    #[must_use]
    pub const fn identity(&self) -> &RunIdentity {
        &self.identity
    }

    /// Gets a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Gets a value by key, failing with `MissingDependency` when absent.
    pub fn require(&self, key: &str) -> Result<&serde_json::Value, StageError> {
        self.data
            .get(key)
            .ok_or_else(|| StageError::missing_dependency(key))
    }

    /// Checks whether a key exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Sets a value, overwriting any existing entry.
    pub fn set(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Returns a copy of all entries.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        self.data.clone()
    }

    /// Returns all keys.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the context holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
