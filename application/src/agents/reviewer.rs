//! Reviewer: final project review, quick checks and the delivery report.
//!
//! Every operation here degrades instead of failing. A review that cannot
//! be obtained is an unapproved [`ReviewResult`] with one blocker; a report
//! the model cannot write is rendered from the default template.

use super::base::{Agent, AgentReply};
use foundry_domain::{
    AgentPromptTemplate, DeliveryReport, FileSet, Parsed, ProjectPlan, QuickCheckResult,
    ResponseParser, ReviewResult,
};
use std::collections::BTreeMap;
use tracing::{info, warn};

pub struct ReviewerAgent {
    agent: Agent,
    file_char_cap: usize,
}

impl ReviewerAgent {
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

    /// One-shot review of the whole project.
    ///
    /// Stateless: the prompt is self-contained (request, design document,
    /// file tree, task checklist, test results and capped file contents)
    /// and is not part of the rolling conversation.
    pub async fn review_project(
        &self,
        request: &str,
        plan: &ProjectPlan,
        files: &FileSet,
        test_results: &[String],
    ) -> AgentReply<ReviewResult> {
        let prompt =
            AgentPromptTemplate::review(request, plan, files, test_results, self.file_char_cap);
        let outcome = self.agent.process_task(&prompt, &BTreeMap::new()).await;

        let result = if !outcome.success {
            ReviewResult::failed(outcome.error_message())
        } else {
            match ResponseParser::parse_value(&outcome.content) {
                Parsed::Parsed(json) => ReviewResult::from_json(&json).unwrap_or_else(|| {
                    ReviewResult::failed("reviewer response had no approval verdict")
                }),
                Parsed::Unparsed => ReviewResult::failed("reviewer response was not valid JSON"),
            }
        };

        info!(
            approved = result.approved,
            completion = result.completion_percentage,
            blockers = result.blockers.len(),
            "Review finished"
        );

        AgentReply { outcome, result }
    }

    /// Cheap sanity check on one task's files.
    pub async fn quick_check(&self, task_title: &str, files: &FileSet) -> QuickCheckResult {
        let prompt = AgentPromptTemplate::quick_check(task_title, files, self.file_char_cap);
        let outcome = self.agent.process_task(&prompt, &BTreeMap::new()).await;

        if !outcome.success {
            return QuickCheckResult::failed(outcome.error_message());
        }
        ResponseParser::parse_value(&outcome.content)
            .into_option()
            .and_then(|json| QuickCheckResult::from_json(&json))
            .unwrap_or_else(|| QuickCheckResult::failed("quick check response had no verdict"))
    }

    /// Final report: model-written when possible, the default template otherwise.
    pub async fn delivery_report(
        &self,
        plan: &ProjectPlan,
        review: &ReviewResult,
        files: &FileSet,
    ) -> DeliveryReport {
        let review_json = serde_json::to_string_pretty(review).unwrap_or_default();
        let prompt = AgentPromptTemplate::delivery_report(plan, &review_json, files);
        let outcome = self.agent.process_task(&prompt, &BTreeMap::new()).await;

        if outcome.success
            && let Some(report) = DeliveryReport::from_model(&outcome.content)
        {
            return report;
        }

        warn!(
            "Delivery report generation failed ({}); using default template",
            outcome.error_message()
        );
        DeliveryReport::render_default(plan, review)
    }
}
