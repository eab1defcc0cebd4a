//! Compaction artifacts.
//!
//! A [`Summary`] replaces a contiguous prefix of the conversation with one
//! synthetic `summary` message. Token counts are always computed locally
//! with [`TokenEstimator`], never taken from the model's own claims.

use super::message::ConversationMessage;
use super::token_estimator::TokenEstimator;
use crate::core::string::head_chars;
use serde::{Deserialize, Serialize};

/// Characters kept per message by the deterministic fallback.
pub const DEFAULT_FALLBACK_CHARS: usize = 200;

const FALLBACK_HEADER: &str = "Summary of earlier conversation (condensed without model assistance):";

/// Result of compacting a run of messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub content: String,
    pub token_count: usize,
    pub original_token_count: usize,
    pub key_facts: Vec<String>,
    pub files_created: Vec<String>,
    pub tech_stack: Option<Vec<String>>,
}

impl Summary {
    /// Build a summary of `source`, computing both token counts locally.
    pub fn new(
        content: impl Into<String>,
        source: &[ConversationMessage],
        key_facts: Vec<String>,
        files_created: Vec<String>,
        tech_stack: Option<Vec<String>>,
    ) -> Self {
        let content = content.into();
        Self {
            token_count: TokenEstimator::estimate(&content),
            original_token_count: Self::source_tokens(source),
            content,
            key_facts,
            files_created,
            tech_stack,
        }
    }

    /// Deterministic compaction used when the model cannot summarize.
    ///
    /// Keeps the first `chars_per_message` characters of each message.
    /// `files_created` comes from the files already recorded in project
    /// memory. The content is never empty.
    pub fn fallback(
        source: &[ConversationMessage],
        known_files: &[String],
        chars_per_message: usize,
    ) -> Self {
        let mut content = String::from(FALLBACK_HEADER);
        for message in source {
            let (head, cut) = head_chars(message.content(), chars_per_message);
            let marker = if cut { "..." } else { "" };
            content.push_str(&format!("\n[{}] {}{}", message.role(), head.trim(), marker));
        }

        Self::new(content, source, Vec::new(), known_files.to_vec(), None)
    }

    /// Estimated cost of the concatenated source messages.
    pub fn source_tokens(source: &[ConversationMessage]) -> usize {
        let joined = source
            .iter()
            .map(ConversationMessage::content)
            .collect::<Vec<_>>()
            .join("\n");
        TokenEstimator::estimate(&joined)
    }

    /// Whether the summary is smaller than what it replaces.
    pub fn is_reduction(&self) -> bool {
        self.token_count < self.original_token_count
    }

    /// Text stored as the synthetic `summary` message.
    pub fn to_message_content(&self) -> String {
        let mut out = self.content.clone();

        if !self.key_facts.is_empty() {
            out.push_str("\n\nKey facts:");
            for fact in &self.key_facts {
                out.push_str(&format!("\n- {}", fact));
            }
        }
        if !self.files_created.is_empty() {
            out.push_str("\n\nFiles: ");
            out.push_str(&self.files_created.join(", "));
        }
        if let Some(stack) = &self.tech_stack
            && !stack.is_empty()
        {
            out.push_str("\n\nTech stack: ");
            out.push_str(&stack.join(", "));
        }

        out
    }
}
