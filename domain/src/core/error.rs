//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid compaction threshold: {0} (must be within (0, 100])")]
    InvalidThreshold(f64),

    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Plan has no tasks")]
    EmptyPlan,

    #[error("No plan could be recovered from the planner response")]
    UnparseablePlan,

    #[error("Context snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl DomainError {
    /// Check if the planner response yielded no usable plan
    pub fn is_plan_failure(&self) -> bool {
        matches!(self, DomainError::EmptyPlan | DomainError::UnparseablePlan)
    }

    /// Check if this error came from a corrupt or incompatible snapshot
    pub fn is_snapshot(&self) -> bool {
        matches!(self, DomainError::Snapshot(_))
    }
}
