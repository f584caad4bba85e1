//! Coordinator construction and execution.
//!
//! This module provides:
//! - The coordinator builder with registration-time validation
//! - The sequential coordinator (run, status queries)
//! - The run result types returned to callers
//! - Deadline helpers for bounding a whole run

mod builder;
mod coordinator;
#[cfg(test)]
mod integration_tests;
mod result;
mod runtime;

pub use builder::CoordinatorBuilder;
pub use coordinator::PipelineCoordinator;
pub use result::{RunResult, StageReport};
pub use runtime::{run_with_deadline, TimedRun};
