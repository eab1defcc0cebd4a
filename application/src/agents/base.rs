//! Shared call-and-parse plumbing for every agent role.

use crate::ports::model_transport::{ModelTransport, TransportError};
use foundry_domain::{AgentOutcome, AgentPromptTemplate, AgentRole};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default bound on a single model round trip.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(300);

/// Raw round-trip outcome paired with the role's typed interpretation of it.
#[derive(Debug, Clone)]
pub struct AgentReply<T> {
    pub outcome: AgentOutcome,
    pub result: T,
}

/// One role bound to a model and a transport.
///
/// Transport errors and timeouts never escape: they come back as an
/// unsuccessful [`AgentOutcome`].
#[derive(Clone)]
pub struct Agent {
    role: AgentRole,
    model_id: String,
    transport: Arc<dyn ModelTransport>,
    call_timeout: Duration,
}

impl Agent {
    pub fn new(
        role: AgentRole,
        model_id: impl Into<String>,
        transport: Arc<dyn ModelTransport>,
    ) -> Self {
        Self {
            role,
            model_id: model_id.into(),
            transport,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn role(&self) -> AgentRole {
        self.role
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Single request/response round trip.
    pub async fn call(&self, prompt: &str) -> AgentOutcome {
        debug!(
            role = %self.role,
            model = %self.model_id,
            prompt_chars = prompt.len(),
            "Invoking model"
        );

        let result = tokio::time::timeout(
            self.call_timeout,
            self.transport.invoke(prompt, &self.model_id),
        )
        .await
        .unwrap_or_else(|_| Err(TransportError::Timeout(self.call_timeout.as_secs())));

        match result {
            Ok(content) if !content.trim().is_empty() => AgentOutcome::succeeded(content),
            Ok(_) => {
                warn!(role = %self.role, "Model returned an empty response");
                AgentOutcome::failed(TransportError::EmptyOutput.to_string())
            }
            Err(e) => {
                warn!(role = %self.role, model = %self.model_id, "Model call failed: {}", e);
                AgentOutcome::failed(e.to_string())
            }
        }
    }

    /// Base contract: the role instruction, the task, and an optional
    /// side-channel of context entries rendered in key order.
    pub async fn process_task(
        &self,
        task: &str,
        context: &BTreeMap<String, String>,
    ) -> AgentOutcome {
        let prompt = AgentPromptTemplate::process_task(
            AgentPromptTemplate::role_instruction(self.role),
            task,
            context,
        );
        self.call(&prompt).await
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("role", &self.role)
            .field("model_id", &self.model_id)
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[tokio::test]
    async fn test_call_success() {
        let transport = ScriptedTransport::new(vec![text("hello")]);
        let agent = Agent::new(AgentRole::Coder, "gpt-4o", transport.clone());
        let outcome = agent.call("prompt").await;
        assert!(outcome.success);
        assert_eq!(outcome.content, "hello");
        assert_eq!(transport.prompts.lock().unwrap()[0].1, "gpt-4o");
    }

    #[tokio::test]
    async fn test_transport_error_becomes_failed_outcome() {
        let transport = ScriptedTransport::new(vec![Scripted::Error("boom".to_string())]);
        let agent = Agent::new(AgentRole::Tester, "m", transport);
        let outcome = agent.call("prompt").await;
        assert!(!outcome.success);
        assert_eq!(outcome.error_message(), "Request failed: boom");
    }

    #[tokio::test]
    async fn test_blank_response_is_failure() {
        let transport = ScriptedTransport::new(vec![text("   ")]);
        let agent = Agent::new(AgentRole::Tester, "m", transport);
        let outcome = agent.call("prompt").await;
        assert!(!outcome.success);
        assert_eq!(outcome.error_message(), "Model returned empty output");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_becomes_failed_outcome() {
        let transport = ScriptedTransport::new(vec![Scripted::Hang]);
        let agent = Agent::new(AgentRole::Planner, "m", transport)
            .with_timeout(Duration::from_secs(5));
        let outcome = agent.call("prompt").await;
        assert!(!outcome.success);
        assert_eq!(outcome.error_message(), "Model call timed out after 5s");
    }

    #[tokio::test]
    async fn test_process_task_merges_context() {
        let transport = ScriptedTransport::new(vec![text("ok")]);
        let agent = Agent::new(AgentRole::Reviewer, "m", transport.clone());
        let mut context = BTreeMap::new();
        context.insert("conversation".to_string(), "earlier turns".to_string());
        agent.process_task("Review it", &context).await;

        let prompt = transport.prompt(0);
        assert!(prompt.starts_with(AgentPromptTemplate::role_instruction(AgentRole::Reviewer)));
        assert!(prompt.contains("## Task\n\nReview it"));
        assert!(prompt.contains("### conversation\n\nearlier turns"));
    }
}
