//! Planner: project request → [`ProjectPlan`].

use super::base::{Agent, AgentReply};
use foundry_domain::{AgentPromptTemplate, ProjectPlan, parse_plan};
use std::collections::BTreeMap;
use tracing::{info, warn};

pub struct PlannerAgent {
    agent: Agent,
}

impl PlannerAgent {
    pub fn new(agent: Agent) -> Self {
        Self { agent }
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Ask for a plan. The error string explains why no plan was produced.
    pub async fn create_plan(
        &self,
        request: &str,
        context: &BTreeMap<String, String>,
    ) -> AgentReply<Result<ProjectPlan, String>> {
        let outcome = self
            .agent
            .process_task(&AgentPromptTemplate::planning(request), context)
            .await;

        if !outcome.success {
            let error = outcome.error_message();
            return AgentReply {
                outcome,
                result: Err(error),
            };
        }

        let result = match parse_plan(&outcome.content) {
            Ok(plan) => {
                info!(
                    project = %plan.project_name,
                    tasks = plan.tasks.len(),
                    "Plan created"
                );
                Ok(plan)
            }
            Err(e) => {
                warn!("Planner response rejected: {}", e);
                Err(e.to_string())
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

    fn planner(replies: Vec<Scripted>) -> PlannerAgent {
        PlannerAgent::new(Agent::new(
            AgentRole::Planner,
            "m",
            ScriptedTransport::new(replies),
        ))
    }

    #[tokio::test]
    async fn test_plan_from_prose_wrapped_json() {
        let planner = planner(vec![text(
            r#"Sure! {"projectName": "cli", "tasks": [{"title": "Scaffold"}]} Done."#,
        )]);
        let reply = planner.create_plan("a cli", &BTreeMap::new()).await;
        let plan = reply.result.unwrap();
        assert_eq!(plan.project_name, "cli");
        assert_eq!(plan.tasks[0].id.as_str(), "1");
    }

    #[tokio::test]
    async fn test_empty_task_list_is_no_plan() {
        let planner = planner(vec![text(r#"{"projectName": "cli", "tasks": []}"#)]);
        let reply = planner.create_plan("a cli", &BTreeMap::new()).await;
        assert!(reply.outcome.success);
        assert_eq!(reply.result.unwrap_err(), "Plan has no tasks");
    }

    #[tokio::test]
    async fn test_transport_failure_is_no_plan() {
        let planner = planner(vec![Scripted::Error("offline".to_string())]);
        let reply = planner.create_plan("a cli", &BTreeMap::new()).await;
        assert!(!reply.outcome.success);
        assert!(reply.result.unwrap_err().contains("offline"));
    }
}
