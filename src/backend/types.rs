use serde::{Deserialize, Serialize};

use crate::core::history::ChatTurn;

/// Free-form metadata sent alongside the query.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub platform: String,
}

/// Body of `POST /api/v1/chat/stream`.
///
/// `history` is the rolling window as it stood *before* this query;
/// the query itself travels separately.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub query: String,
    pub history: Vec<ChatTurn>,
    pub user_context: UserContext,
}

/// A retrieved document the answer was grounded on.
/// The backend owns this shape; every field is optional on our side.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SourceDocument {
    pub id: Option<i64>,
    pub score: Option<f64>,
    pub text: Option<String>,
    pub source_type: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// One `data: ` frame of the response stream, tagged by its `type` field.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    Sources {
        #[serde(default)]
        sources: Vec<SourceDocument>,
    },
    Content {
        content: String,
    },
    Error {
        #[serde(default)]
        content: String,
    },
    /// Any `type` we don't know. Skipped by the consumer.
    #[serde(other)]
    Unknown,
}
