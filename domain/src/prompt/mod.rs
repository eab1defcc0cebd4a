//! Prompt domain
//!
//! Templates for each agent role and for history compaction.

pub mod agent;

pub use agent::{AgentPromptTemplate, render_files};
