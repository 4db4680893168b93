//! # Conversation History
//!
//! The rolling window of completed exchanges sent with every request.
//!
//! ```text
//! push(user) push(assistant) ... → [oldest ... newest]   (len ≤ limit)
//! ```
//!
//! Only finished turns land here. A turn that fails or is cancelled
//! leaves the history untouched.

use serde::{Deserialize, Serialize};

/// Default number of entries kept (five user/assistant exchanges).
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Who authored a turn. Serialized as the backend expects.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single entry in the conversation history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Bounded, insertion-ordered log of chat turns.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationHistory {
    turns: Vec<ChatTurn>,
    limit: usize,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl ConversationHistory {
    /// A limit of zero is bumped to one so the latest turn is always kept.
    pub fn new(limit: usize) -> Self {
        Self {
            turns: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Records one completed exchange, then drops the oldest entries
    /// beyond the limit.
    pub fn record_exchange(&mut self, query: &str, response: &str) {
        self.turns.push(ChatTurn::user(query));
        self.turns.push(ChatTurn::assistant(response));
        self.truncate();
    }

    fn truncate(&mut self) {
        if self.turns.len() > self.limit {
            let overflow = self.turns.len() - self.limit;
            self.turns.drain(..overflow);
        }
    }
}
