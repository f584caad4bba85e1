//! # Taskflow
//!
//! A sequential task-stage pipeline coordinator.
//!
//! Taskflow runs a fixed, ordered registry of named stages against an
//! accumulating execution context:
//!
//! - **Stage-based execution**: each stage is a pluggable body wrapped in
//!   a live `{status, details, result, error}` record
//! - **Context propagation**: every stage's result is merged back under
//!   `"<name>_result"` for the stages after it
//! - **Stop on first error**: a failing stage halts the run; later stages
//!   are left untouched
//! - **Live status queries**: per-stage and whole-registry snapshots
//! - **Event-driven observability**: lifecycle events through a pluggable
//!   sink, structured logs through `tracing`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use taskflow::prelude::*;
//!
//! let coordinator = PipelineCoordinator::builder("task-run")
//!     .with_task_stages()?
//!     .build()?;
//!
//! let mut initial = std::collections::HashMap::new();
//! initial.insert(
//!     "messages".to_string(),
//!     serde_json::json!([{"role": "user", "content": "deploy the service"}]),
//! );
//!
//! let result = coordinator.run_all(initial).await;
//! assert!(result.succeeded());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod context;
pub mod core;
pub mod errors;
pub mod events;
pub mod observability;
pub mod pipeline;
pub mod stages;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::context::{result_key, ExecutionContext, Message, RunIdentity};
    pub use crate::core::{StageStatus, StatusSnapshot};
    pub use crate::errors::{PipelineError, PipelineValidationError, StageError};
    pub use crate::events::{EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::pipeline::{
        run_with_deadline, CoordinatorBuilder, PipelineCoordinator, RunResult, StageReport,
        TimedRun,
    };
    pub use crate::stages::{FnBody, Stage, StageBody};
}
