//! Context budget manager.
//!
//! [`ContextManager`] is the single writer of a [`ContextState`]. It appends
//! messages, tracks usage against the model's usable budget, and applies
//! compaction. It never blocks an append: when usage crosses the threshold
//! it reports [`BudgetState::CompactionDue`] and the caller compacts before
//! its next model call.
//!
//! # Guaranteed progress
//!
//! [`compact`](ContextManager::compact) must shrink the context. When the
//! supplied summary does not (the summarizer produced something larger than
//! its input), the manager rolls the summary back and falls through to
//! [`hard_truncate`](ContextManager::hard_truncate), which drops the oldest
//! raw messages until usage is below the threshold again. Project memory is
//! exempt from both.

use super::budget::{BudgetState, CompactionPolicy};
use super::memory::ProjectMemory;
use super::message::{ConversationMessage, MessageRole};
use super::state::ContextState;
use super::summary::Summary;
use crate::core::error::DomainError;
use crate::model::{ModelConfig, ModelConfigRegistry};
use serde::{Deserialize, Serialize};

/// What a compaction request actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompactionOutcome {
    /// The oldest `replaced` messages were replaced by one summary message
    Compacted {
        before: usize,
        after: usize,
        replaced: usize,
    },
    /// The summary did not shrink the context; `dropped` raw messages were discarded
    HardTruncated {
        before: usize,
        after: usize,
        dropped: usize,
    },
}

impl CompactionOutcome {
    pub fn tokens_before(&self) -> usize {
        match self {
            CompactionOutcome::Compacted { before, .. }
            | CompactionOutcome::HardTruncated { before, .. } => *before,
        }
    }

    pub fn tokens_after(&self) -> usize {
        match self {
            CompactionOutcome::Compacted { after, .. }
            | CompactionOutcome::HardTruncated { after, .. } => *after,
        }
    }

    pub fn is_hard_truncation(&self) -> bool {
        matches!(self, CompactionOutcome::HardTruncated { .. })
    }
}

/// Owner of one run's conversation window and project memory.
#[derive(Debug, Clone)]
pub struct ContextManager {
    state: ContextState,
    policy: CompactionPolicy,
}

impl ContextManager {
    pub fn new(model_config: ModelConfig, policy: CompactionPolicy) -> Self {
        Self {
            state: ContextState::new(model_config),
            policy,
        }
    }

    /// Create a manager for a model id resolved through [`ModelConfigRegistry`].
    pub fn for_model(model_id: &str, policy: CompactionPolicy) -> Self {
        Self::new(ModelConfigRegistry::lookup(model_id), policy)
    }

    // ==================== Accessors ====================

    pub fn state(&self) -> &ContextState {
        &self.state
    }

    pub fn policy(&self) -> &CompactionPolicy {
        &self.policy
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        self.state.messages()
    }

    pub fn project_memory(&self) -> &ProjectMemory {
        self.state.project_memory()
    }

    pub fn cumulative_tokens(&self) -> usize {
        self.state.cumulative_tokens()
    }

    // ==================== Project Memory ====================

    /// Replace the project header fields. Idempotent.
    pub fn set_project_info<I, S>(&mut self, name: &str, description: &str, tech_stack: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .edit_memory(|memory| memory.set_info(name, description, tech_stack));
    }

    pub fn add_decision(&mut self, text: impl Into<String>) {
        self.state.edit_memory(|memory| memory.add_decision(text));
    }

    pub fn add_file(&mut self, path: impl Into<String>) {
        self.state.edit_memory(|memory| memory.add_file(path));
    }

    /// Clear project memory. Only done at the start of a run.
    pub fn reset_project_memory(&mut self) {
        self.state.reset_memory();
    }

    // ==================== Conversation ====================

    /// Append a message and report whether compaction is now due.
    pub fn add_message(
        &mut self,
        role: MessageRole,
        content: impl Into<String>,
        agent: Option<&str>,
    ) -> BudgetState {
        self.state
            .push_message(role, content, agent.map(str::to_string));
        self.budget_state()
    }

    /// Usage as a percentage of the usable budget, clamped to `[0, 100]`.
    pub fn usage_percentage(&self) -> f64 {
        let usable = self.state.usable_budget();
        if usable == 0 {
            return 100.0;
        }
        (self.state.cumulative_tokens() as f64 / usable as f64 * 100.0).min(100.0)
    }

    pub fn budget_state(&self) -> BudgetState {
        self.policy.classify(self.usage_percentage())
    }

    pub fn is_compaction_due(&self) -> bool {
        self.budget_state() == BudgetState::CompactionDue
    }

    /// Human-readable snapshot. Read-only.
    pub fn status_summary(&self) -> String {
        let memory = self.state.project_memory();
        format!(
            "{} messages, {}/{} tokens ({:.1}% of usable budget, {}); pinned: {} decisions, {} files, {} tech",
            self.state.messages().len(),
            self.state.cumulative_tokens(),
            self.state.usable_budget(),
            self.usage_percentage(),
            self.budget_state(),
            memory.decisions().len(),
            memory.files_touched().len(),
            memory.tech_stack().len(),
        )
    }

    /// How many of the oldest messages a compaction should replace.
    ///
    /// All but the `keep_recent` newest, and at least one when any exist.
    pub fn compaction_candidates(&self) -> usize {
        let len = self.state.messages().len();
        if len == 0 {
            return 0;
        }
        len.saturating_sub(self.policy.keep_recent()).max(1)
    }

    /// The slice a compaction of `replace_count` would consume.
    pub fn oldest_messages(&self, replace_count: usize) -> &[ConversationMessage] {
        let messages = self.state.messages();
        &messages[..replace_count.min(messages.len())]
    }

    /// Replace the oldest `replace_count` messages with `summary`.
    ///
    /// Always strictly reduces the token total when any message exists: a
    /// summary that does not shrink the context is rolled back and hard
    /// truncation runs instead.
    pub fn compact(&mut self, summary: &Summary, replace_count: usize) -> CompactionOutcome {
        let before = self.state.cumulative_tokens();
        let count = replace_count.min(self.state.messages().len());
        if count == 0 {
            return self.hard_truncate();
        }

        let summary_message =
            self.state
                .build_message(MessageRole::Summary, summary.to_message_content(), None);
        let removed: Vec<ConversationMessage> = self
            .state
            .messages_mut()
            .splice(..count, std::iter::once(summary_message))
            .collect();
        self.state.recompute_tokens();

        let after = self.state.cumulative_tokens();
        if after < before {
            return CompactionOutcome::Compacted {
                before,
                after,
                replaced: count,
            };
        }

        // Roll back the oversized summary, then guarantee progress.
        let messages = self.state.messages_mut();
        let mut restored = removed;
        restored.extend(messages.drain(1..));
        *messages = restored;
        self.state.recompute_tokens();
        self.hard_truncate()
    }

    /// Drop the oldest messages until usage is below the threshold.
    ///
    /// Drops at least one message when any exist. Lossy for dialogue;
    /// project memory is untouched.
    pub fn hard_truncate(&mut self) -> CompactionOutcome {
        let before = self.state.cumulative_tokens();
        let mut dropped = 0;

        while !self.state.messages().is_empty() && (dropped == 0 || self.is_compaction_due()) {
            self.state.messages_mut().remove(0);
            self.state.recompute_tokens();
            dropped += 1;
        }

        CompactionOutcome::HardTruncated {
            before,
            after: self.state.cumulative_tokens(),
            dropped,
        }
    }

    /// Render pinned memory and the conversation as a prompt prefix.
    pub fn render_conversation(&self) -> String {
        let mut out = self.state.project_memory().to_prompt_section();
        if !self.state.messages().is_empty() {
            out.push_str("\n## Conversation So Far\n\n");
            for message in self.state.messages() {
                out.push_str(&message.to_transcript_line());
                out.push_str("\n\n");
            }
        }
        out
    }

    // ==================== Resume ====================

    /// Serialize the state so an interrupted run can resume.
    pub fn snapshot(&self) -> Result<String, DomainError> {
        Ok(serde_json::to_string(&self.state)?)
    }

    /// Rebuild a manager from [`snapshot`](Self::snapshot) output.
    ///
    /// The token total is recomputed rather than trusted.
    pub fn restore(snapshot: &str, policy: CompactionPolicy) -> Result<Self, DomainError> {
        let mut state: ContextState = serde_json::from_str(snapshot)?;
        state.recompute_tokens();
        Ok(Self { state, policy })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 8192 window - 1024 reserved = 7168 usable tokens
    fn manager() -> ContextManager {
        ContextManager::for_model("gpt-4", CompactionPolicy::default())
    }

    fn fill_to_threshold(manager: &mut ContextManager) {
        // 2000 chars = 500 tokens each
        while !manager.is_compaction_due() {
            manager.add_message(MessageRole::Assistant, "z".repeat(2000), Some("coder"));
        }
    }

    #[test]
    fn test_cumulative_tokens_never_drift() {
        let mut manager = manager();
        manager.set_project_info("demo", "a demo", ["rust"]);
        for i in 0..25 {
            manager.add_message(MessageRole::User, format!("message number {i}"), None);
            manager.add_decision(format!("decision {i}"));
            manager.add_file(format!("src/file_{i}.rs"));
            assert_eq!(
                manager.cumulative_tokens(),
                manager.state().computed_tokens()
            );
        }
    }

    #[test]
    fn test_add_message_flags_compaction() {
        let mut manager = manager();
        assert_eq!(
            manager.add_message(MessageRole::User, "hello", None),
            BudgetState::Healthy
        );
        fill_to_threshold(&mut manager);
        assert_eq!(manager.budget_state(), BudgetState::CompactionDue);
        assert!(manager.usage_percentage() >= 80.0);
    }

    #[test]
    fn test_usage_percentage_is_clamped() {
        let mut manager = manager();
        manager.add_message(MessageRole::User, "y".repeat(100_000), None);
        assert_eq!(manager.usage_percentage(), 100.0);
    }

    #[test]
    fn test_status_summary_is_read_only() {
        let mut manager = manager();
        manager.add_message(MessageRole::User, "build me a todo app", None);
        manager.add_decision("Use SQLite");
        let before = manager.cumulative_tokens();
        let status = manager.status_summary();
        assert!(status.starts_with("1 messages"));
        assert!(status.contains("1 decisions"));
        assert_eq!(manager.cumulative_tokens(), before);
    }

    #[test]
    fn test_compact_with_small_summary() {
        let mut manager = manager();
        fill_to_threshold(&mut manager);
        let usage_before = manager.usage_percentage();
        let count = manager.compaction_candidates();
        let summary = Summary::new(
            "Wrote several files.",
            manager.oldest_messages(count),
            vec![],
            vec![],
            None,
        );

        let outcome = manager.compact(&summary, count);

        assert!(matches!(outcome, CompactionOutcome::Compacted { .. }));
        assert!(outcome.tokens_after() < outcome.tokens_before());
        assert!(manager.usage_percentage() < usage_before);
        assert_eq!(manager.messages()[0].role(), MessageRole::Summary);
        assert_eq!(manager.messages().len(), 1 + manager.policy().keep_recent());
        assert_eq!(manager.cumulative_tokens(), manager.state().computed_tokens());
        assert!(!manager.is_compaction_due());
    }

    #[test]
    fn test_oversized_summary_falls_back_to_hard_truncation() {
        let mut manager = manager();
        manager.add_decision("Keep the public API stable");
        fill_to_threshold(&mut manager);
        let before = manager.cumulative_tokens();
        let summary = Summary::new("w".repeat(40_000), &[], vec![], vec![], None);

        let outcome = manager.compact(&summary, 1);

        assert!(outcome.is_hard_truncation());
        assert!(manager.cumulative_tokens() < before);
        assert!(!manager.is_compaction_due());
        assert!(
            manager
                .messages()
                .iter()
                .all(|m| m.role() != MessageRole::Summary)
        );
        // Durable memory survives
        assert_eq!(
            manager.project_memory().decisions(),
            ["Keep the public API stable"]
        );
    }

    #[test]
    fn test_hard_truncate_drops_at_least_one() {
        let mut manager = manager();
        manager.add_message(MessageRole::User, "first", None);
        manager.add_message(MessageRole::User, "second", None);
        let outcome = manager.hard_truncate();
        assert_eq!(
            outcome,
            CompactionOutcome::HardTruncated {
                before: outcome.tokens_before(),
                after: manager.cumulative_tokens(),
                dropped: 1,
            }
        );
        assert_eq!(manager.messages()[0].content(), "second");
    }

    #[test]
    fn test_hard_truncate_cannot_shrink_oversized_memory() {
        let mut manager = manager();
        // ~6000 tokens of pinned memory against a 5734-token threshold
        manager.add_decision("d".repeat(24_000));
        manager.add_message(MessageRole::User, "first", None);
        manager.add_message(MessageRole::Assistant, "second", Some("coder"));
        assert!(manager.is_compaction_due());

        let outcome = manager.hard_truncate();
        assert!(outcome.is_hard_truncation());
        assert!(manager.messages().is_empty());
        assert_eq!(manager.project_memory().decisions().len(), 1);
        // Memory is never dropped, so the budget stays exhausted
        assert!(manager.is_compaction_due());
        assert_eq!(manager.compaction_candidates(), 0);
    }

    #[test]
    fn test_compaction_candidates_keeps_recent() {
        let mut manager = manager();
        assert_eq!(manager.compaction_candidates(), 0);
        manager.add_message(MessageRole::User, "only", None);
        assert_eq!(manager.compaction_candidates(), 1);
        for _ in 0..9 {
            manager.add_message(MessageRole::User, "more", None);
        }
        assert_eq!(manager.compaction_candidates(), 10 - 4);
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let mut manager = manager();
        manager.set_project_info("demo", "a demo", ["rust", "tokio"]);
        manager.add_message(MessageRole::User, "plan it", None);
        manager.add_file("src/lib.rs");

        let snapshot = manager.snapshot().unwrap();
        let restored = ContextManager::restore(&snapshot, CompactionPolicy::default()).unwrap();

        assert_eq!(restored.state(), manager.state());
        assert_eq!(restored.cumulative_tokens(), manager.cumulative_tokens());
    }

    #[test]
    fn test_restore_rejects_garbage() {
        let err = ContextManager::restore("not a snapshot", CompactionPolicy::default())
            .unwrap_err();
        assert!(err.is_snapshot());
    }

    #[test]
    fn test_render_conversation_pins_memory_first() {
        let mut manager = manager();
        manager.set_project_info("demo", "a demo", ["rust"]);
        manager.add_message(MessageRole::User, "hello", None);
        let rendered = manager.render_conversation();
        let memory_at = rendered.find("## Project Memory").unwrap();
        let convo_at = rendered.find("[user]: hello").unwrap();
        assert!(memory_at < convo_at);
    }
}
