//! [`RunObserver`] adapter that reports progress through `tracing`.

use foundry_application::ports::run_observer::RunObserver;
use foundry_domain::{
    CompactionOutcome, DeliveryReport, OrchestratorPhase, ReviewResult, Task, TaskStatus,
};
use tracing::{info, warn};

/// Logs every run transition at `info` (failures at `warn`).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRunObserver;

impl RunObserver for TracingRunObserver {
    fn on_phase_change(&self, phase: &OrchestratorPhase) {
        match phase {
            OrchestratorPhase::Blocked | OrchestratorPhase::Failed => {
                warn!(target: "foundry::run", "phase -> {}", phase)
            }
            _ => info!(target: "foundry::run", "phase -> {}", phase),
        }
    }

    fn on_task_start(&self, task: &Task) {
        info!(target: "foundry::run", task = %task.id, "Starting task: {}", task.title);
    }

    fn on_task_retry(&self, task: &Task, attempt: u32, max_attempts: u32, error: &str) {
        warn!(
            target: "foundry::run",
            task = %task.id,
            "Attempt {}/{} failed: {}",
            attempt,
            max_attempts,
            error
        );
    }

    fn on_task_complete(&self, task: &Task, status: TaskStatus) {
        if status == TaskStatus::Failed {
            warn!(
                target: "foundry::run",
                task = %task.id,
                attempts = task.attempts,
                "Task failed: {}",
                task.last_error.as_deref().unwrap_or("unknown error")
            );
        } else {
            info!(target: "foundry::run", task = %task.id, "Task {}", status);
        }
    }

    fn on_compaction(&self, outcome: &CompactionOutcome) {
        info!(
            target: "foundry::run",
            before = outcome.tokens_before(),
            after = outcome.tokens_after(),
            "{}",
            if outcome.is_hard_truncation() {
                "Conversation truncated"
            } else {
                "Conversation summarized"
            }
        );
    }

    fn on_budget_exhausted(&self, usage_percent: f64) {
        warn!(
            target: "foundry::run",
            "Project memory fills {:.1}% of the context budget; calls proceed without history",
            usage_percent
        );
    }

    fn on_review(&self, result: &ReviewResult) {
        info!(target: "foundry::run", "{}", result.verdict_line());
        for blocker in &result.blockers {
            warn!(target: "foundry::run", "Blocker: {}", blocker);
        }
    }

    fn on_report(&self, report: &DeliveryReport) {
        info!(
            target: "foundry::run",
            model_generated = report.model_generated,
            chars = report.content.len(),
            "Delivery report ready"
        );
    }
}
