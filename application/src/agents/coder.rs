//! Coder: one task → proposed file contents.

use super::base::{Agent, AgentReply};
use foundry_domain::{
    AgentPromptTemplate, CodeProposal, FileSet, Parsed, ProjectPlan, ResponseParser, Task,
};
use std::collections::BTreeMap;
use tracing::debug;

pub struct CoderAgent {
    agent: Agent,
    file_char_cap: usize,
}

impl CoderAgent {
    pub fn new(agent: Agent) -> Self {
        Self {
            agent,
            file_char_cap: 3000,
        }
    }

    pub fn with_file_char_cap(mut self, cap: usize) -> Self {
        self.file_char_cap = cap;
        self
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Propose files for `task`. The previous failure, if any, is fed back.
    ///
    /// A response without any file is a failed attempt.
    pub async fn implement(
        &self,
        task: &Task,
        plan: &ProjectPlan,
        files: &FileSet,
        context: &BTreeMap<String, String>,
    ) -> AgentReply<Result<CodeProposal, String>> {
        let prompt = AgentPromptTemplate::coding(
            task,
            plan,
            files,
            task.last_error.as_deref(),
            self.file_char_cap,
        );
        let outcome = self.agent.process_task(&prompt, context).await;

        if !outcome.success {
            let error = outcome.error_message();
            return AgentReply {
                outcome,
                result: Err(error),
            };
        }

        let result = match ResponseParser::parse_value(&outcome.content) {
            Parsed::Parsed(json) => CodeProposal::from_json(&json)
                .ok_or_else(|| "Coder response contained no files".to_string()),
            Parsed::Unparsed => Err("Coder response was not valid JSON".to_string()),
        };

        if let Ok(proposal) = &result {
            debug!(task = %task.id, files = proposal.files.len(), "Code proposed");
        }

        AgentReply { outcome, result }
    }
}
