//! Reasoning stage: interprets the user's request.

use super::StageBody;
use crate::context::{ExecutionContext, Message};
use crate::errors::StageError;
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;

/// Interprets the latest user message and extracts the task intent.
///
/// Requires the `messages` context key seeded by the caller: a list of
/// `{role, content}` objects. The most recent user message is treated as
/// the task request.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReasoningStage;

#[async_trait]
impl StageBody for ReasoningStage {
    async fn run(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<HashMap<String, serde_json::Value>, StageError> {
        let messages: Vec<Message> = serde_json::from_value(ctx.require("messages")?.clone())?;
        if messages.is_empty() {
            return Err(StageError::internal("conversation is empty"));
        }

        let user_message = messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .ok_or_else(|| StageError::internal("no user message in conversation"))?;

        // TODO: replace the canned interpretation with a completion-model call.
        let mut result = HashMap::new();
        result.insert("intent".to_string(), json!("task_execution"));
        result.insert("input".to_string(), json!(user_message.content));
        result.insert(
            "key_points".to_string(),
            json!(["stated goal", "implied constraints"]),
        );
        result.insert(
            "requirements".to_string(),
            json!(["produce an ordered subtask plan", "report progress per stage"]),
        );
        result.insert(
            "constraints".to_string(),
            json!(["sequential execution", "halt on first failure"]),
        );

        Ok(result)
    }

    fn running_note(&self) -> String {
        "analyzing user input".to_string()
    }

    fn completed_note(&self) -> String {
        "user input analysis complete".to_string()
    }
}
