//! Agent domain module
//!
//! Plans, tasks, review verdicts and the typed results of each agent role.

pub mod entities;
pub mod phase;
pub mod plan_parser;
pub mod review;
pub mod value_objects;

pub use entities::{FileSet, ProjectPlan, Task, TaskStatus};
pub use phase::{OrchestratorPhase, RunOutcome};
pub use plan_parser::{parse_plan, parse_plan_json};
pub use review::{CodeQuality, RequirementCoverage, ReviewResult};
pub use value_objects::{
    AgentOutcome, AgentRole, CodeProposal, FileChange, QuickCheckResult, TaskId, TestReport,
};
