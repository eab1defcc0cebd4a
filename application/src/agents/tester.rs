//! Tester: a task's files → pass/fail verdict.

use super::base::{Agent, AgentReply};
use foundry_domain::{AgentPromptTemplate, FileSet, Parsed, ResponseParser, Task, TestReport};
use std::collections::BTreeMap;

pub struct TesterAgent {
    agent: Agent,
    file_char_cap: usize,
}

impl TesterAgent {
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

    /// Evaluate `files` against `task`.
    ///
    /// No verdict (transport or parse failure) is reported as a failing test.
    pub async fn test(
        &self,
        task: &Task,
        files: &FileSet,
        context: &BTreeMap<String, String>,
    ) -> AgentReply<TestReport> {
        let prompt = AgentPromptTemplate::testing(task, files, self.file_char_cap);
        let outcome = self.agent.process_task(&prompt, context).await;

        let result = if !outcome.success {
            TestReport::failed(outcome.error_message())
        } else {
            match ResponseParser::parse_value(&outcome.content) {
                Parsed::Parsed(json) => TestReport::from_json(&json)
                    .unwrap_or_else(|| TestReport::failed("tester response had no verdict")),
                Parsed::Unparsed => TestReport::failed("tester response was not valid JSON"),
            }
        };

        AgentReply { outcome, result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::base::test_support::*;
    use foundry_domain::AgentRole;

    fn tester(replies: Vec<Scripted>) -> TesterAgent {
        TesterAgent::new(Agent::new(
            AgentRole::Tester,
            "m",
            ScriptedTransport::new(replies),
        ))
    }

    #[tokio::test]
    async fn test_passing_verdict() {
        let tester = tester(vec![text(r#"{"passed": true, "summary": "all good"}"#)]);
        let reply = tester
            .test(&Task::new("1", "x"), &FileSet::new(), &BTreeMap::new())
            .await;
        assert!(reply.result.passed);
        assert_eq!(reply.result.summary, "all good");
    }

    #[tokio::test]
    async fn test_unparseable_counts_as_failure() {
        let tester = tester(vec![text("Looks fine to me!")]);
        let reply = tester
            .test(&Task::new("1", "x"), &FileSet::new(), &BTreeMap::new())
            .await;
        assert!(reply.outcome.success);
        assert!(!reply.result.passed);
        assert!(reply.result.summary.contains("not valid JSON"));
    }

    #[tokio::test]
    async fn test_transport_failure_counts_as_failure() {
        let tester = tester(vec![Scripted::Error("503".to_string())]);
        let reply = tester
            .test(&Task::new("1", "x"), &FileSet::new(), &BTreeMap::new())
            .await;
        assert!(!reply.result.passed);
        assert!(reply.result.failures[0].contains("503"));
    }
}
