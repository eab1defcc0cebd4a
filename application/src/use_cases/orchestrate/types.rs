//! Type definitions for the Orchestrate use case.

use foundry_domain::{
    ContextManager, DeliveryReport, DomainError, FileSet, ProjectPlan, ReviewResult, RunOutcome,
};
use thiserror::Error;

/// Errors that end a run.
///
/// Transport and parse failures never appear here: they degrade into
/// failed attempts, failed tasks or unapproved reviews.
#[derive(Error, Debug)]
pub enum OrchestrationError {
    #[error("Planning failed: {0}")]
    PlanningFailed(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl OrchestrationError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, OrchestrationError::Cancelled)
    }
}

/// Input for the Orchestrate use case
#[derive(Debug, Clone)]
pub struct OrchestrateInput {
    /// The user's project request
    pub request: String,
    /// Files already present before the run (relative path → content)
    pub existing_files: FileSet,
    /// Conversation restored from a snapshot of an interrupted run
    pub resume_context: Option<ContextManager>,
}

impl OrchestrateInput {
    pub fn new(request: impl Into<String>) -> Self {
        Self {
            request: request.into(),
            existing_files: FileSet::new(),
            resume_context: None,
        }
    }

    pub fn with_existing_files(mut self, files: FileSet) -> Self {
        self.existing_files = files;
        self
    }

    pub fn with_resume_context(mut self, context: ContextManager) -> Self {
        self.resume_context = Some(context);
        self
    }
}

/// Output of a run that got past planning
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub outcome: RunOutcome,
    /// Final plan, including rework tasks and their statuses
    pub plan: ProjectPlan,
    /// Every file present at the end of the run
    pub files: FileSet,
    /// The last review verdict
    pub review: ReviewResult,
    pub report: DeliveryReport,
    /// Human-readable context budget snapshot at the end of the run
    pub context_status: String,
    /// The run's conversation, for snapshotting
    pub context: ContextManager,
    /// Compactions (including hard truncations) applied during the run
    pub compactions: usize,
    /// Review attempts made
    pub review_rounds: u32,
}

impl RunOutput {
    pub fn is_delivered(&self) -> bool {
        self.outcome.is_delivered()
    }
}
