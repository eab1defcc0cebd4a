//! Orchestrate use case.
//!
//! Drives one project request through the full cycle:
//!
//! ```text
//! Planning → [Executing → Testing → (Reworking)]* per task
//!          → Reviewing → Delivering
//!                      ↘ ReworkingPlan → tasks → Reviewing ...
//!                      ↘ Blocked (no rework rounds left)
//! ```
//!
//! The orchestrator is the sole owner of the run's [`ContextManager`].
//! Compaction happens synchronously before any call that would see an
//! over-threshold conversation, so no agent ever receives one.

mod execution;
mod review;
mod types;

pub use types::{OrchestrateInput, OrchestrationError, RunOutput};

use crate::agents::{Agent, CoderAgent, PlannerAgent, ReviewerAgent, Summarizer, TesterAgent};
use crate::config::{OrchestrationParams, RoleModels};
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::model_transport::ModelTransport;
use crate::ports::run_observer::{NoRunObserver, RunObserver};
use execution::{Run, RunAgents};
use foundry_domain::{AgentRole, ContextManager, ModelConfigRegistry, ProjectPlan, TaskStatus};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Use case for turning a project request into delivered files.
pub struct OrchestrateUseCase {
    transport: Arc<dyn ModelTransport>,
    models: RoleModels,
    params: OrchestrationParams,
    logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl OrchestrateUseCase {
    pub fn new(transport: Arc<dyn ModelTransport>, models: RoleModels) -> Self {
        Self {
            transport,
            models,
            params: OrchestrationParams::default(),
            logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    pub fn with_params(mut self, params: OrchestrationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn params(&self) -> &OrchestrationParams {
        &self.params
    }

    pub fn models(&self) -> &RoleModels {
        &self.models
    }

    /// Execute without progress callbacks
    pub async fn execute(&self, input: OrchestrateInput) -> Result<RunOutput, OrchestrationError> {
        self.execute_with_observer(input, &NoRunObserver).await
    }

    /// Execute the full cycle, reporting transitions to `observer`.
    ///
    /// Returns `Err` only when no plan could be produced, the run was
    /// cancelled, or the parameters are unusable. Every other failure
    /// degrades into failed tasks or an unapproved review and still ends
    /// with a report.
    pub async fn execute_with_observer(
        &self,
        input: OrchestrateInput,
        observer: &dyn RunObserver,
    ) -> Result<RunOutput, OrchestrationError> {
        if self.params.max_task_retries == 0 {
            return Err(OrchestrationError::InvalidConfig(
                "max_task_retries must be at least 1".to_string(),
            ));
        }

        let OrchestrateInput {
            request,
            existing_files,
            resume_context,
        } = input;

        let manager = match resume_context {
            Some(manager) => {
                info!(
                    messages = manager.messages().len(),
                    "Resuming from saved conversation"
                );
                manager
            }
            None => {
                let model = ModelConfigRegistry::lookup(self.models.conversation_model());
                let mut manager = ContextManager::new(model, self.params.compaction.clone());
                manager.reset_project_memory();
                manager
            }
        };

        info!(
            model = self.models.conversation_model(),
            existing_files = existing_files.len(),
            "Starting orchestration"
        );

        let mut run = Run {
            params: &self.params,
            observer,
            logger: self.logger.as_ref(),
            cancellation: &self.cancellation_token,
            agents: self.build_agents(),
            manager,
            plan: ProjectPlan::new("", ""),
            files: existing_files,
            test_results: Vec::new(),
            compactions: 0,
        };

        run.create_plan(&request).await?;
        run.execute_pending_tasks().await?;
        let (outcome, review, review_rounds) = run.review_until_settled(&request).await?;
        let report = run.report(&review).await?;

        info!(
            delivered = outcome.is_delivered(),
            completed = run.count(TaskStatus::Completed),
            failed = run.count(TaskStatus::Failed),
            compactions = run.compactions,
            "Orchestration finished"
        );

        Ok(RunOutput {
            outcome,
            context_status: run.manager.status_summary(),
            plan: run.plan,
            files: run.files,
            review,
            report,
            context: run.manager,
            compactions: run.compactions,
            review_rounds,
        })
    }

    fn build_agents(&self) -> RunAgents {
        let agent = |role: AgentRole| {
            Agent::new(role, self.models.model_for(role), self.transport.clone())
                .with_timeout(self.params.call_timeout)
        };
        let cap = self.params.review_file_char_cap;

        RunAgents {
            planner: PlannerAgent::new(agent(AgentRole::Planner)),
            coder: CoderAgent::new(agent(AgentRole::Coder)).with_file_char_cap(cap),
            tester: TesterAgent::new(agent(AgentRole::Tester)).with_file_char_cap(cap),
            reviewer: ReviewerAgent::new(agent(AgentRole::Reviewer)).with_file_char_cap(cap),
            summarizer: Summarizer::new(agent(AgentRole::Summarizer))
                .with_fallback_chars(self.params.fallback_chars_per_message),
        }
    }
}
