//! Model-assisted history compaction with a deterministic fallback.
//!
//! [`Summarizer::summarize`] never fails. A transport error, a response no
//! parse tier can recover, or an empty summary all produce
//! [`Summary::fallback`] instead.

use super::base::Agent;
use foundry_domain::context::summary::DEFAULT_FALLBACK_CHARS;
use foundry_domain::{
    AgentPromptTemplate, ConversationMessage, Parsed, ResponseParser, Summary,
};
use serde::Deserialize;
use tracing::{debug, warn};

/// Shape the summarization prompt asks for.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryPayload {
    summary: String,
    #[serde(default)]
    key_facts: Vec<String>,
    #[serde(default)]
    files_created: Vec<String>,
    #[serde(default)]
    tech_stack: Vec<String>,
}

pub struct Summarizer {
    agent: Agent,
    fallback_chars: usize,
}

impl Summarizer {
    pub fn new(agent: Agent) -> Self {
        Self {
            agent,
            fallback_chars: DEFAULT_FALLBACK_CHARS,
        }
    }

    pub fn with_fallback_chars(mut self, chars: usize) -> Self {
        self.fallback_chars = chars;
        self
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Compact `messages` into one [`Summary`].
    ///
    /// `known_files` (from project memory) populates `files_created` when
    /// the fallback is used. Token counts are computed locally either way.
    pub async fn summarize(
        &self,
        messages: &[ConversationMessage],
        known_files: &[String],
    ) -> Summary {
        if messages.is_empty() {
            return Summary::fallback(messages, known_files, self.fallback_chars);
        }

        let transcript = messages
            .iter()
            .map(ConversationMessage::to_transcript_line)
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt = AgentPromptTemplate::process_task(
            AgentPromptTemplate::role_instruction(self.agent.role()),
            &AgentPromptTemplate::summarization(&transcript),
            &Default::default(),
        );
        let outcome = self.agent.call(&prompt).await;

        if !outcome.success {
            warn!(
                "Summarization failed ({}); using truncation fallback",
                outcome.error_message()
            );
            return Summary::fallback(messages, known_files, self.fallback_chars);
        }

        match ResponseParser::parse::<SummaryPayload>(&outcome.content) {
            Parsed::Parsed(payload) if !payload.summary.trim().is_empty() => {
                let tech_stack = (!payload.tech_stack.is_empty()).then_some(payload.tech_stack);
                let summary = Summary::new(
                    payload.summary.trim(),
                    messages,
                    payload.key_facts,
                    payload.files_created,
                    tech_stack,
                );
                debug!(
                    original = summary.original_token_count,
                    compacted = summary.token_count,
                    "Summarized {} messages",
                    messages.len()
                );
                summary
            }
            _ => {
                warn!("Summary response unusable; using truncation fallback");
                Summary::fallback(messages, known_files, self.fallback_chars)
            }
        }
    }
}
