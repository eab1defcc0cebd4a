//! Context budget subdomain.
//!
//! Tracks cumulative token usage across a growing conversation and compacts
//! history before the model's context window is exceeded.
//!
//! - [`token_estimator::TokenEstimator`]: cheap heuristic token counts
//! - [`message::ConversationMessage`]: immutable conversation entries
//! - [`memory::ProjectMemory`]: durable facts that survive compaction
//! - [`state::ContextState`]: messages + memory + running token total
//! - [`budget::CompactionPolicy`]: when compaction becomes due
//! - [`summary::Summary`]: compaction artifact (model or deterministic)
//! - [`manager::ContextManager`]: single writer over a `ContextState`

pub mod budget;
pub mod manager;
pub mod memory;
pub mod message;
pub mod state;
pub mod summary;
pub mod token_estimator;

pub use budget::{BudgetState, CompactionPolicy};
pub use manager::{CompactionOutcome, ContextManager};
pub use memory::ProjectMemory;
pub use message::{ConversationMessage, MessageRole};
pub use state::ContextState;
pub use summary::Summary;
pub use token_estimator::TokenEstimator;
