//! Application layer for code-foundry
//!
//! This crate contains the agent roles, the orchestration use case, port
//! definitions, and application configuration. It depends only on the
//! domain layer.

pub mod agents;
pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use agents::{
    Agent, AgentReply, CoderAgent, DEFAULT_CALL_TIMEOUT, PlannerAgent, ReviewerAgent, Summarizer,
    TesterAgent,
};
pub use config::{OrchestrationParams, RoleModels};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    model_transport::{ModelTransport, TransportError},
    run_observer::{NoRunObserver, RunObserver},
};
pub use use_cases::orchestrate::{
    OrchestrateInput, OrchestrateUseCase, OrchestrationError, RunOutput,
};
