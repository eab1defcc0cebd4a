//! Run progress port.
//!
//! [`RunObserver`] is an **output port** the outer layers implement to follow
//! an orchestration run. The orchestrator calls it at each state transition
//! instead of printing anything itself.
//!
//! All methods have default no-op implementations, so implementers only
//! override the callbacks they care about.

use foundry_domain::{
    CompactionOutcome, DeliveryReport, OrchestratorPhase, ReviewResult, Task, TaskStatus,
};

/// Observer for orchestration runs.
pub trait RunObserver: Send + Sync {
    /// Called when the run moves to a new phase
    fn on_phase_change(&self, _phase: &OrchestratorPhase) {}

    /// Called when a task begins its first attempt
    fn on_task_start(&self, _task: &Task) {}

    /// Called when a coder or tester attempt fails and the task will be retried
    fn on_task_retry(&self, _task: &Task, _attempt: u32, _max_attempts: u32, _error: &str) {}

    /// Called when a task reaches a terminal status
    fn on_task_complete(&self, _task: &Task, _status: TaskStatus) {}

    /// Called after history was compacted (or hard-truncated)
    fn on_compaction(&self, _outcome: &CompactionOutcome) {}

    /// Called when usage stays at or above the threshold with no messages
    /// left to drop (project memory alone fills it)
    fn on_budget_exhausted(&self, _usage_percent: f64) {}

    /// Called with every review verdict, approved or not
    fn on_review(&self, _result: &ReviewResult) {}

    /// Called once with the final delivery report
    fn on_report(&self, _report: &DeliveryReport) {}
}

/// No-op implementation for tests and quiet runs.
pub struct NoRunObserver;

impl RunObserver for NoRunObserver {}
