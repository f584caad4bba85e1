//! Error types for the taskflow pipeline.
//!
//! The taxonomy is small and deliberate: stages fail with [`StageError`]
//! (a missing context dependency or an internal failure), the coordinator
//! boundary adds [`PipelineError::StageNotFound`] for status queries, and
//! construction-time problems surface as [`PipelineValidationError`].

use thiserror::Error;

/// Errors produced by a stage body during execution.
#[derive(Debug, Clone, Error)]
pub enum StageError {
    /// A context key required by the stage was absent.
    ///
    /// Registration order is the only dependency mechanism, so this is
    /// what a stage sees when it runs before its producer or when the
    /// caller's initial context lacks a seed key.
    #[error("MissingDependency: {key}")]
    MissingDependency {
        /// The absent context key.
        key: String,
    },

    /// The stage body failed for internal or domain reasons.
    #[error("{0}")]
    Internal(String),
}

impl StageError {
    /// Creates a missing-dependency error for a context key.
    #[must_use]
    pub fn missing_dependency(key: impl Into<String>) -> Self {
        Self::MissingDependency { key: key.into() }
    }

    /// Creates an internal failure from a message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this is a missing-dependency error.
    #[must_use]
    pub const fn is_missing_dependency(&self) -> bool {
        matches!(self, Self::MissingDependency { .. })
    }
}

impl From<anyhow::Error> for StageError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

impl From<serde_json::Error> for StageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("malformed context value: {err}"))
    }
}

/// Errors surfaced at the coordinator boundary.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// A status query referenced a name that is not in the registry.
    #[error("StageNotFound: {name}")]
    StageNotFound {
        /// The queried stage name.
        name: String,
    },

    /// A stage failed during a run.
    #[error("{0}")]
    Stage(#[from] StageError),

    /// The coordinator could not be constructed.
    #[error("{0}")]
    Validation(#[from] PipelineValidationError),
}

impl PipelineError {
    /// Creates a stage-not-found error.
    #[must_use]
    pub fn stage_not_found(name: impl Into<String>) -> Self {
        Self::StageNotFound { name: name.into() }
    }
}

/// Error raised when a coordinator fails registration-time validation.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct PipelineValidationError {
    /// The error message.
    pub message: String,
    /// The stages involved in the error.
    pub stages: Vec<String>,
}

impl PipelineValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stages: Vec::new(),
        }
    }

    /// Sets the stages involved.
    #[must_use]
    pub fn with_stages(mut self, stages: Vec<String>) -> Self {
        self.stages = stages;
        self
    }
}
