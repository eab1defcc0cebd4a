//! Review loop, rework planning and the delivery report.

use super::execution::Run;
use super::types::OrchestrationError;
use crate::ports::conversation_logger::ConversationEvent;
use crate::use_cases::shared::check_cancelled;
use foundry_domain::core::string::truncate;
use foundry_domain::{DeliveryReport, OrchestratorPhase, ReviewResult, RunOutcome, Task, TaskId};
use serde_json::json;
use tracing::{info, warn};

/// Maximum title length of a task derived from a review item.
const REWORK_TITLE_CHARS: usize = 80;

impl Run<'_> {
    /// Review, then rework and review again until approved or out of rounds.
    ///
    /// Returns the terminal outcome, the last review and the number of
    /// reviews made.
    pub(super) async fn review_until_settled(
        &mut self,
        request: &str,
    ) -> Result<(RunOutcome, ReviewResult, u32), OrchestrationError> {
        let mut rework_round = 0u32;
        let mut reviews = 0u32;

        loop {
            self.set_phase(OrchestratorPhase::Reviewing);
            let review = self.review(request).await?;
            reviews += 1;

            if review.approved {
                self.set_phase(OrchestratorPhase::Delivering);
                return Ok((RunOutcome::Delivered, review, reviews));
            }

            if rework_round >= self.params.max_review_reworks {
                warn!(
                    rounds = rework_round,
                    blockers = review.blockers.len(),
                    "Review rejected with no rework rounds left"
                );
                self.set_phase(OrchestratorPhase::Blocked);
                let blockers = if review.blockers.is_empty() {
                    unresolved_items(&review)
                } else {
                    review.blockers.clone()
                };
                return Ok((RunOutcome::Blocked { blockers }, review, reviews));
            }

            rework_round += 1;
            let added = self.add_rework_tasks(rework_round, &review);
            self.set_phase(OrchestratorPhase::ReworkingPlan {
                round: rework_round,
                tasks: added,
            });
            self.execute_pending_tasks().await?;
        }
    }

    /// One stateless review of the whole project.
    async fn review(&mut self, request: &str) -> Result<ReviewResult, OrchestrationError> {
        check_cancelled(self.cancellation)?;
        let test_results = self.test_result_lines();
        let reply = self
            .agents
            .reviewer
            .review_project(request, &self.plan, &self.files, &test_results)
            .await;
        let review = reply.result;

        self.manager.add_decision(review.verdict_line());
        self.observer.on_review(&review);
        self.logger.log(ConversationEvent::new(
            "review",
            json!({
                "approved": review.approved,
                "completion_percentage": review.completion_percentage,
                "quality_score": review.code_quality.score,
                "missing_items": review.missing_items,
                "blockers": review.blockers,
            }),
        ));
        Ok(review)
    }

    /// Turn a rejected review into new pending tasks. Returns how many.
    ///
    /// Each missing item and blocker becomes one task. A rejection that
    /// names nothing still gets one task built from the review summary.
    fn add_rework_tasks(&mut self, round: u32, review: &ReviewResult) -> usize {
        let items = unresolved_items(review);
        for (index, item) in items.iter().enumerate() {
            let task = Task::new(
                TaskId::rework(round, index + 1),
                truncate(item, REWORK_TITLE_CHARS),
            )
            .with_description(item.as_str());
            self.plan.add_task(task);
        }

        info!(round, tasks = items.len(), "Added rework tasks from review");
        self.manager.add_decision(format!(
            "Review round {} requested {} rework tasks",
            round,
            items.len()
        ));
        items.len()
    }

    /// Produce the final report. Always yields one.
    pub(super) async fn report(
        &mut self,
        review: &ReviewResult,
    ) -> Result<DeliveryReport, OrchestrationError> {
        check_cancelled(self.cancellation)?;
        let report = self
            .agents
            .reviewer
            .delivery_report(&self.plan, review, &self.files)
            .await;
        self.observer.on_report(&report);
        self.logger.log(ConversationEvent::new(
            "report",
            json!({
                "model_generated": report.model_generated,
                "content": report.content,
            }),
        ));
        Ok(report)
    }
}

/// What a rejected review left open: its missing items and blockers, or a
/// single line from the summary when it names nothing. Never empty.
fn unresolved_items(review: &ReviewResult) -> Vec<String> {
    let items = review.rework_items();
    if !items.is_empty() {
        return items;
    }
    let summary = if review.summary.is_empty() {
        "the project was not approved"
    } else {
        review.summary.as_str()
    };
    vec![format!("Address reviewer feedback: {}", summary)]
}
