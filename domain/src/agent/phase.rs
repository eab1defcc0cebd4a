//! Orchestrator phases and terminal outcomes.

use super::value_objects::TaskId;
use serde::{Deserialize, Serialize};

/// Current position of a run in the plan → code → test → review cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrchestratorPhase {
    Planning,
    Executing { task: TaskId },
    Testing { task: TaskId },
    /// A task is retried after a failed coder or tester attempt
    Reworking { task: TaskId },
    /// Rework tasks derived from a rejected review are being executed
    ReworkingPlan { round: u32, tasks: usize },
    Reviewing,
    Delivering,
    Blocked,
    Failed,
}

impl OrchestratorPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrchestratorPhase::Delivering | OrchestratorPhase::Blocked | OrchestratorPhase::Failed
        )
    }
}

impl std::fmt::Display for OrchestratorPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestratorPhase::Planning => write!(f, "planning"),
            OrchestratorPhase::Executing { task } => write!(f, "executing({})", task),
            OrchestratorPhase::Testing { task } => write!(f, "testing({})", task),
            OrchestratorPhase::Reworking { task } => write!(f, "reworking({})", task),
            OrchestratorPhase::ReworkingPlan { round, tasks } => {
                write!(f, "reworking(round {}, {} tasks)", round, tasks)
            }
            OrchestratorPhase::Reviewing => write!(f, "reviewing"),
            OrchestratorPhase::Delivering => write!(f, "delivering"),
            OrchestratorPhase::Blocked => write!(f, "blocked"),
            OrchestratorPhase::Failed => write!(f, "failed"),
        }
    }
}

/// How a run that got past planning ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Delivered,
    /// Review rejected with no rework budget left; blockers are the reviewer's, verbatim
    Blocked { blockers: Vec<String> },
}

impl RunOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, RunOutcome::Delivered)
    }
}
