//! Run identity for tracking coordinator runs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one coordinator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunIdentity {
    /// The unique ID for this run.
    pub run_id: Uuid,

    /// Optional caller-supplied correlation ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
}

impl RunIdentity {
    /// Creates a run identity with a freshly generated run ID.
    #[must_use]
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            request_id: None,
        }
    }

    /// Sets the request ID.
    #[must_use]
    pub const fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = Some(request_id);
        self
    }
}

impl Default for RunIdentity {
    fn default() -> Self {
        Self::new()
    }
}
