//! Per-run state and the plan → code → test loop.
//!
//! [`Run`] owns the run's [`ContextManager`], so it is the only writer of
//! the conversation. Every call that grows the conversation goes through
//! [`Run::prepare_call`], which appends the request note and compacts
//! synchronously before the model is invoked.

use super::types::OrchestrationError;
use crate::agents::{CoderAgent, PlannerAgent, ReviewerAgent, Summarizer, TesterAgent};
use crate::config::OrchestrationParams;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::run_observer::RunObserver;
use crate::use_cases::shared::check_cancelled;
use foundry_domain::{
    AgentOutcome, AgentRole, CompactionOutcome, ContextManager, FileSet, MessageRole,
    OrchestratorPhase, ProjectPlan, Task, TaskId, TaskStatus,
};
use serde_json::json;
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Context key under which the rendered conversation is passed to agents.
pub(super) const CONVERSATION_KEY: &str = "conversation";

/// The five role agents of one run.
pub(super) struct RunAgents {
    pub(super) planner: PlannerAgent,
    pub(super) coder: CoderAgent,
    pub(super) tester: TesterAgent,
    pub(super) reviewer: ReviewerAgent,
    pub(super) summarizer: Summarizer,
}

/// Mutable state of one orchestration run.
pub(super) struct Run<'a> {
    pub(super) params: &'a OrchestrationParams,
    pub(super) observer: &'a dyn RunObserver,
    pub(super) logger: &'a dyn ConversationLogger,
    pub(super) cancellation: &'a Option<CancellationToken>,
    pub(super) agents: RunAgents,
    pub(super) manager: ContextManager,
    pub(super) plan: ProjectPlan,
    pub(super) files: FileSet,
    /// Latest tester verdict line per task, in first-tested order
    pub(super) test_results: Vec<(TaskId, String)>,
    pub(super) compactions: usize,
}

impl Run<'_> {
    pub(super) fn set_phase(&self, phase: OrchestratorPhase) {
        info!("Phase: {}", phase);
        self.observer.on_phase_change(&phase);
    }

    // ==================== Conversation ====================

    /// Compact if due, append the request note, and return the agent context.
    ///
    /// A reply recorded by the previous call may have crossed the threshold,
    /// so compaction finishes before the note is appended. The note itself
    /// can cross it too, hence the second check.
    pub(super) async fn prepare_call(
        &mut self,
        role: AgentRole,
        note: &str,
    ) -> Result<BTreeMap<String, String>, OrchestrationError> {
        check_cancelled(self.cancellation)?;
        self.ensure_budget().await;
        self.manager
            .add_message(MessageRole::User, note, Some(role.as_str()));
        self.ensure_budget().await;
        check_cancelled(self.cancellation)?;

        let mut context = BTreeMap::new();
        context.insert(
            CONVERSATION_KEY.to_string(),
            self.manager.render_conversation(),
        );
        Ok(context)
    }

    /// Record the agent's reply (or its failure) in the conversation.
    pub(super) fn record_reply(&mut self, role: AgentRole, outcome: &AgentOutcome) {
        let content = if outcome.success {
            outcome.content.clone()
        } else {
            format!("(call failed: {})", outcome.error_message())
        };
        let state = self
            .manager
            .add_message(MessageRole::Assistant, content, Some(role.as_str()));
        debug!(role = %role, budget = %state, "Reply recorded");
        self.log_call(role, outcome);
    }

    /// Compact synchronously when usage is at or above the threshold.
    ///
    /// After this returns, usage is below the threshold (hard truncation
    /// covers a summary that did not shrink the history enough), unless
    /// project memory alone is over it. Memory is never dropped, so that
    /// case is reported through `on_budget_exhausted` and the call proceeds.
    pub(super) async fn ensure_budget(&mut self) {
        if !self.manager.is_compaction_due() {
            return;
        }

        let count = self.manager.compaction_candidates();
        if count > 0 {
            info!(
                usage = %format!("{:.1}%", self.manager.usage_percentage()),
                messages = count,
                "Compacting conversation history"
            );
            let summary = self
                .agents
                .summarizer
                .summarize(
                    self.manager.oldest_messages(count),
                    self.manager.project_memory().files_touched(),
                )
                .await;
            let outcome = self.manager.compact(&summary, count);
            self.report_compaction(&outcome);

            if self.manager.is_compaction_due() && !self.manager.messages().is_empty() {
                warn!("Still above threshold after compaction; truncating oldest messages");
                let outcome = self.manager.hard_truncate();
                self.report_compaction(&outcome);
            }
        }

        if self.manager.is_compaction_due() {
            let usage = self.manager.usage_percentage();
            warn!(
                usage = %format!("{:.1}%", usage),
                memory_tokens = self.manager.project_memory().token_size(),
                "Project memory alone exceeds the compaction threshold"
            );
            self.observer.on_budget_exhausted(usage);
            self.logger.log(ConversationEvent::new(
                "budget_exhausted",
                json!({
                    "usage_percent": usage,
                    "memory_tokens": self.manager.project_memory().token_size(),
                }),
            ));
        }
    }

    fn report_compaction(&mut self, outcome: &CompactionOutcome) {
        self.compactions += 1;
        info!(
            before = outcome.tokens_before(),
            after = outcome.tokens_after(),
            hard = outcome.is_hard_truncation(),
            "Context compacted"
        );
        self.observer.on_compaction(outcome);
        self.logger.log(ConversationEvent::new(
            "compaction",
            json!({
                "tokens_before": outcome.tokens_before(),
                "tokens_after": outcome.tokens_after(),
                "hard_truncation": outcome.is_hard_truncation(),
                "usage_percent": self.manager.usage_percentage(),
            }),
        ));
    }

    fn log_call(&self, role: AgentRole, outcome: &AgentOutcome) {
        self.logger.log(ConversationEvent::new(
            "agent_call",
            json!({
                "role": role.as_str(),
                "success": outcome.success,
                "content": outcome.content,
                "error": outcome.error,
            }),
        ));
    }

    // ==================== Planning ====================

    /// Ask the Planner for a plan. No plan is fatal for the run.
    pub(super) async fn create_plan(&mut self, request: &str) -> Result<(), OrchestrationError> {
        self.set_phase(OrchestratorPhase::Planning);
        let context = self
            .prepare_call(AgentRole::Planner, &format!("Project request: {}", request))
            .await?;
        let reply = self.agents.planner.create_plan(request, &context).await;
        self.record_reply(AgentRole::Planner, &reply.outcome);

        let plan = match reply.result {
            Ok(plan) => plan,
            Err(reason) => {
                self.set_phase(OrchestratorPhase::Failed);
                return Err(OrchestrationError::PlanningFailed(reason));
            }
        };

        self.manager.set_project_info(
            &plan.project_name,
            &plan.description,
            plan.tech_stack.iter().cloned(),
        );
        self.manager.add_decision(format!(
            "Planned {} tasks for {}",
            plan.tasks.len(),
            plan.project_name
        ));
        self.logger.log(ConversationEvent::new(
            "plan_created",
            json!({
                "project_name": plan.project_name,
                "tasks": plan.tasks.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(),
            }),
        ));
        self.plan = plan;
        Ok(())
    }

    // ==================== Task Loop ====================

    /// Execute every pending task in plan order.
    pub(super) async fn execute_pending_tasks(&mut self) -> Result<(), OrchestrationError> {
        for task_id in self.plan.pending_task_ids() {
            self.execute_task(&task_id).await?;
        }
        Ok(())
    }

    /// Code → (quick check) → test, retried up to `max_task_retries` attempts.
    ///
    /// Exhausting the attempts marks the task failed; the run continues.
    async fn execute_task(&mut self, task_id: &TaskId) -> Result<(), OrchestrationError> {
        let task = self.plan.task_mut(task_id)?;
        task.mark_in_progress();
        let task = task.clone();
        self.observer.on_task_start(&task);

        loop {
            let task = self.task(task_id)?;
            let attempt = task.attempts + 1;
            self.set_phase(if attempt == 1 {
                OrchestratorPhase::Executing {
                    task: task_id.clone(),
                }
            } else {
                OrchestratorPhase::Reworking {
                    task: task_id.clone(),
                }
            });

            // Code
            let context = self
                .prepare_call(
                    AgentRole::Coder,
                    &format!("Implement task {} (attempt {}): {}", task.id, attempt, task.title),
                )
                .await?;
            let reply = self
                .agents
                .coder
                .implement(&task, &self.plan, &self.files, &context)
                .await;
            self.record_reply(AgentRole::Coder, &reply.outcome);

            let proposal = match reply.result {
                Ok(proposal) => proposal,
                Err(error) => {
                    if self.fail_attempt(task_id, error)? {
                        return Ok(());
                    }
                    continue;
                }
            };

            let mut task_files = FileSet::new();
            for change in proposal.files {
                self.manager.add_file(change.path.as_str());
                self.files.insert(change.path.clone(), change.content.clone());
                task_files.insert(change.path, change.content);
            }

            if self.params.quick_check {
                check_cancelled(self.cancellation)?;
                let check = self
                    .agents
                    .reviewer
                    .quick_check(&task.title, &task_files)
                    .await;
                if !check.ok {
                    let issues = format!("Quick check failed: {}", check.issues.join("; "));
                    if self.fail_attempt(task_id, issues)? {
                        return Ok(());
                    }
                    continue;
                }
            }

            // Test
            self.set_phase(OrchestratorPhase::Testing {
                task: task_id.clone(),
            });
            let context = self
                .prepare_call(
                    AgentRole::Tester,
                    &format!("Test task {} (attempt {}): {}", task.id, attempt, task.title),
                )
                .await?;
            let reply = self.agents.tester.test(&task, &task_files, &context).await;
            self.record_reply(AgentRole::Tester, &reply.outcome);
            let report = reply.result;
            self.record_test_result(
                &task,
                attempt,
                &format!(
                    "{}: {}",
                    if report.passed { "passed" } else { "failed" },
                    report.summary
                ),
            );

            if report.passed {
                self.complete_task(task_id)?;
                return Ok(());
            }
            if self.fail_attempt(task_id, report.feedback())? {
                return Ok(());
            }
        }
    }

    fn task(&self, task_id: &TaskId) -> Result<Task, OrchestrationError> {
        self.plan
            .task(task_id)
            .cloned()
            .ok_or_else(|| foundry_domain::DomainError::UnknownTask(task_id.to_string()).into())
    }

    fn record_test_result(&mut self, task: &Task, attempt: u32, verdict: &str) {
        let line = format!(
            "Task {} ({}), attempt {}: {}",
            task.id, task.title, attempt, verdict
        );
        match self.test_results.iter_mut().find(|(id, _)| id == &task.id) {
            Some((_, existing)) => *existing = line,
            None => self.test_results.push((task.id.clone(), line)),
        }
    }

    fn complete_task(&mut self, task_id: &TaskId) -> Result<(), OrchestrationError> {
        let task = self.plan.task_mut(task_id)?;
        task.mark_completed();
        let task = task.clone();

        info!(task = %task.id, "Task completed");
        self.manager
            .add_decision(format!("Task {} ({}) completed", task.id, task.title));
        self.finish_task(&task);
        Ok(())
    }

    /// Count a failed attempt. Returns `true` when the task is now failed.
    fn fail_attempt(&mut self, task_id: &TaskId, error: String) -> Result<bool, OrchestrationError> {
        let max_attempts = self.params.max_task_retries;
        let task = self.plan.task_mut(task_id)?;
        task.record_attempt_failure(error.as_str());

        if task.attempts < max_attempts {
            let task = task.clone();
            warn!(
                task = %task.id,
                attempt = task.attempts,
                max = max_attempts,
                "Task attempt failed: {}",
                error
            );
            self.observer
                .on_task_retry(&task, task.attempts, max_attempts, &error);
            return Ok(false);
        }

        task.mark_failed(error.as_str());
        let task = task.clone();
        warn!(task = %task.id, attempts = task.attempts, "Task failed: {}", error);
        self.manager.add_decision(format!(
            "Task {} ({}) failed after {} attempts: {}",
            task.id, task.title, task.attempts, error
        ));
        self.finish_task(&task);
        Ok(true)
    }

    fn finish_task(&self, task: &Task) {
        self.observer.on_task_complete(task, task.status);
        self.logger.log(ConversationEvent::new(
            "task_complete",
            json!({
                "task": task.id.as_str(),
                "status": task.status.as_str(),
                "attempts": task.attempts,
                "error": task.last_error,
            }),
        ));
    }

    pub(super) fn test_result_lines(&self) -> Vec<String> {
        self.test_results
            .iter()
            .map(|(_, line)| line.clone())
            .collect()
    }

    pub(super) fn count(&self, status: TaskStatus) -> usize {
        self.plan.count_with_status(status)
    }
}
