//! Agent roles
//!
//! Each role wraps one call-and-parse cycle around the shared [`Agent`]
//! round trip and maps the response to a typed, degradable result.

pub mod base;
pub mod coder;
pub mod planner;
pub mod reviewer;
pub mod summarizer;
pub mod tester;

pub use base::{Agent, AgentReply, DEFAULT_CALL_TIMEOUT};
pub use coder::CoderAgent;
pub use planner::PlannerAgent;
pub use reviewer::ReviewerAgent;
pub use summarizer::Summarizer;
pub use tester::TesterAgent;
