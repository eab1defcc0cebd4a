//! Conversation messages held in the rolling context window.

use super::token_estimator::TokenEstimator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    System,
    /// Synthetic message produced by compaction
    Summary,
}

impl MessageRole {
    pub fn as_str(&self) -> &str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
            MessageRole::Summary => "summary",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A message in the conversation (Entity).
///
/// Immutable once appended. `token_count` is computed at construction and
/// never recomputed, so the running total in
/// [`ContextState`](super::state::ContextState) cannot drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessage {
    id: u64,
    role: MessageRole,
    content: String,
    timestamp: DateTime<Utc>,
    token_count: usize,
    producing_agent: Option<String>,
}

impl ConversationMessage {
    pub(crate) fn new(
        id: u64,
        role: MessageRole,
        content: impl Into<String>,
        producing_agent: Option<String>,
    ) -> Self {
        let content = content.into();
        Self {
            id,
            role,
            token_count: TokenEstimator::estimate(&content),
            content,
            timestamp: Utc::now(),
            producing_agent,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn token_count(&self) -> usize {
        self.token_count
    }

    pub fn producing_agent(&self) -> Option<&str> {
        self.producing_agent.as_deref()
    }

    /// Render as a transcript line: `[role/agent]: content`.
    pub fn to_transcript_line(&self) -> String {
        match &self.producing_agent {
            Some(agent) => format!("[{}/{}]: {}", self.role, agent, self.content),
            None => format!("[{}]: {}", self.role, self.content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_count_fixed_at_construction() {
        let msg = ConversationMessage::new(1, MessageRole::User, "abcdefgh", None);
        assert_eq!(msg.token_count(), 2);
        assert_eq!(msg.role(), MessageRole::User);
        assert!(msg.producing_agent().is_none());
    }

    #[test]
    fn test_transcript_line_includes_agent() {
        let msg = ConversationMessage::new(
            7,
            MessageRole::Assistant,
            "wrote src/lib.rs",
            Some("coder".to_string()),
        );
        assert_eq!(msg.to_transcript_line(), "[assistant/coder]: wrote src/lib.rs");

        let plain = ConversationMessage::new(8, MessageRole::Summary, "earlier work", None);
        assert_eq!(plain.to_transcript_line(), "[summary]: earlier work");
    }

    #[test]
    fn test_role_serializes_snake_case() {
        let json = serde_json::to_string(&MessageRole::Summary).unwrap();
        assert_eq!(json, "\"summary\"");
    }
}
