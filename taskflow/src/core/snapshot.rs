//! Status snapshots describing a stage's current state.

use super::StageStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A point-in-time record of a stage's state.
///
/// `result` and `error` are mutually exclusive: at most one is populated
/// at any time. `details` carries the latest human-readable progress note.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// The current status.
    pub status: StageStatus,

    /// Human-readable progress note, updated on status changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    /// Result mapping, present once the stage completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<HashMap<String, serde_json::Value>>,

    /// Error message, present only when the status is `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusSnapshot {
    /// Creates a pending snapshot with no details.
    #[must_use]
    pub fn pending() -> Self {
        Self::default()
    }

    /// Converts the snapshot to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert(
            "status".to_string(),
            serde_json::json!(self.status.to_string()),
        );
        map.insert("details".to_string(), serde_json::json!(self.details));
        map.insert(
            "result".to_string(),
            match &self.result {
                Some(result) => {
                    serde_json::Value::Object(result.clone().into_iter().collect())
                }
                None => serde_json::Value::Null,
            },
        );
        map.insert("error".to_string(), serde_json::json!(self.error));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_snapshot() {
        let snapshot = StatusSnapshot::pending();
        assert_eq!(snapshot.status, StageStatus::Pending);
        assert!(snapshot.details.is_none());
        assert!(snapshot.result.is_none());
        assert!(snapshot.error.is_none());
    }

    #[test]
    fn test_to_dict_keeps_all_four_fields() {
        let snapshot = StatusSnapshot {
            status: StageStatus::Error,
            details: Some("analyzing user input".to_string()),
            result: None,
            error: Some("no user message in conversation".to_string()),
        };

        let dict = snapshot.to_dict();
        assert_eq!(dict.get("status"), Some(&serde_json::json!("error")));
        assert_eq!(
            dict.get("details"),
            Some(&serde_json::json!("analyzing user input"))
        );
        assert_eq!(dict.get("result"), Some(&serde_json::Value::Null));
        assert_eq!(
            dict.get("error"),
            Some(&serde_json::json!("no user message in conversation"))
        );
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut result = HashMap::new();
        result.insert("intent".to_string(), serde_json::json!("task_execution"));

        let snapshot = StatusSnapshot {
            status: StageStatus::Completed,
            details: Some("user input analysis complete".to_string()),
            result: Some(result),
            error: None,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: StatusSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.status, StageStatus::Completed);
        assert!(decoded.error.is_none());
        assert_eq!(
            decoded.result.unwrap().get("intent"),
            Some(&serde_json::json!("task_execution"))
        );
    }
}
