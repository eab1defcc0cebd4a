//! Domain layer for code-foundry
//!
//! Pure logic with no I/O: model registry, token estimation, the context
//! budget manager, response parsing, plan and review entities, prompt
//! templates and the delivery report.
//!
//! # Core Concepts
//!
//! ## Context budget
//!
//! A run's conversation grows with every agent call. The
//! [`ContextManager`] tracks its estimated token cost against the model's
//! usable window and compacts the oldest messages into a [`Summary`] before
//! the window is exceeded. [`ProjectMemory`] is pinned and never compacted.
//!
//! ## Agents
//!
//! Planner, Coder, Tester and Reviewer each run one call-and-parse cycle.
//! Their output is recovered through the three-tier [`ResponseParser`] and
//! mapped to typed results ([`ProjectPlan`], [`CodeProposal`],
//! [`TestReport`], [`ReviewResult`]) that degrade instead of failing.

pub mod agent;
pub mod config;
pub mod context;
pub mod core;
pub mod model;
pub mod parsing;
pub mod prompt;
pub mod report;

// Re-export commonly used types
pub use agent::{
    AgentOutcome, AgentRole, CodeProposal, CodeQuality, FileChange, FileSet, OrchestratorPhase,
    ProjectPlan, QuickCheckResult, RequirementCoverage, ReviewResult, RunOutcome, Task, TaskId,
    TaskStatus, TestReport, parse_plan, parse_plan_json,
};
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use context::{
    BudgetState, CompactionOutcome, CompactionPolicy, ContextManager, ContextState,
    ConversationMessage, MessageRole, ProjectMemory, Summary, TokenEstimator,
};
pub use core::error::DomainError;
pub use model::{ModelConfig, ModelConfigRegistry, ModelProvider};
pub use parsing::{ParseStrategy, Parsed, ResponseParser};
pub use prompt::AgentPromptTemplate;
pub use report::DeliveryReport;
