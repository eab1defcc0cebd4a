//! Mutable conversation and project-memory store.

use super::memory::ProjectMemory;
use super::message::{ConversationMessage, MessageRole};
use crate::model::ModelConfig;
use serde::{Deserialize, Serialize};

/// Conversation window plus durable memory for one run.
///
/// Invariant: `cumulative_tokens == sum(message token counts) +
/// project_memory.token_size()`. Every mutation goes through
/// [`ContextManager`](super::manager::ContextManager), which keeps the total
/// in step; [`recompute_tokens`](Self::recompute_tokens) rebuilds it from
/// scratch after structural edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextState {
    model_config: ModelConfig,
    messages: Vec<ConversationMessage>,
    project_memory: ProjectMemory,
    cumulative_tokens: usize,
    next_message_id: u64,
}

impl ContextState {
    pub fn new(model_config: ModelConfig) -> Self {
        let project_memory = ProjectMemory::default();
        Self {
            cumulative_tokens: project_memory.token_size(),
            model_config,
            messages: Vec::new(),
            project_memory,
            next_message_id: 1,
        }
    }

    // ==================== Accessors ====================

    pub fn model_config(&self) -> &ModelConfig {
        &self.model_config
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn project_memory(&self) -> &ProjectMemory {
        &self.project_memory
    }

    pub fn cumulative_tokens(&self) -> usize {
        self.cumulative_tokens
    }

    /// Tokens available for conversation once output is reserved.
    pub fn usable_budget(&self) -> usize {
        self.model_config.usable_budget()
    }

    /// Recompute the total from the messages and memory as they stand now.
    pub fn computed_tokens(&self) -> usize {
        self.messages
            .iter()
            .map(ConversationMessage::token_count)
            .sum::<usize>()
            + self.project_memory.token_size()
    }

    // ==================== Mutation (ContextManager only) ====================

    pub(crate) fn push_message(
        &mut self,
        role: MessageRole,
        content: impl Into<String>,
        producing_agent: Option<String>,
    ) -> &ConversationMessage {
        let message = self.build_message(role, content, producing_agent);
        self.cumulative_tokens += message.token_count();
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub(crate) fn build_message(
        &mut self,
        role: MessageRole,
        content: impl Into<String>,
        producing_agent: Option<String>,
    ) -> ConversationMessage {
        let id = self.next_message_id;
        self.next_message_id += 1;
        ConversationMessage::new(id, role, content, producing_agent)
    }

    pub(crate) fn messages_mut(&mut self) -> &mut Vec<ConversationMessage> {
        &mut self.messages
    }

    /// Apply an edit to project memory, keeping the running total in step.
    pub(crate) fn edit_memory(&mut self, edit: impl FnOnce(&mut ProjectMemory)) {
        let before = self.project_memory.token_size();
        edit(&mut self.project_memory);
        let after = self.project_memory.token_size();
        self.cumulative_tokens = self.cumulative_tokens - before + after;
    }

    pub(crate) fn reset_memory(&mut self) {
        self.edit_memory(|memory| *memory = ProjectMemory::default());
    }

    pub(crate) fn recompute_tokens(&mut self) {
        self.cumulative_tokens = self.computed_tokens();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelConfigRegistry;

    fn state() -> ContextState {
        ContextState::new(ModelConfigRegistry::lookup("gpt-4"))
    }

    #[test]
    fn test_new_state_counts_memory() {
        let state = state();
        assert!(state.messages().is_empty());
        assert_eq!(state.cumulative_tokens(), state.computed_tokens());
        assert_eq!(state.usable_budget(), 8_192 - 1_024);
    }

    #[test]
    fn test_push_assigns_increasing_ids() {
        let mut state = state();
        let first = state.push_message(MessageRole::User, "one", None).id();
        let second = state.push_message(MessageRole::User, "two", None).id();
        assert!(second > first);
        assert_eq!(state.cumulative_tokens(), state.computed_tokens());
    }

    #[test]
    fn test_edit_memory_tracks_tokens() {
        let mut state = state();
        state.edit_memory(|memory| memory.add_decision("Use PostgreSQL for persistence"));
        assert_eq!(state.cumulative_tokens(), state.computed_tokens());

        state.reset_memory();
        assert!(state.project_memory().decisions().is_empty());
        assert_eq!(state.cumulative_tokens(), state.computed_tokens());
    }
}
