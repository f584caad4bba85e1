//! Test support: mock stage bodies.

mod mocks;

pub use mocks::{FailingBody, MockBody};
