//! Logging infrastructure
//!
//! - [`JsonlConversationLogger`]: JSONL transcript writer implementing the
//!   [`ConversationLogger`](foundry_application::ConversationLogger) port
//! - [`TracingRunObserver`]: run progress reported through `tracing`

mod jsonl_logger;
mod tracing_observer;

pub use jsonl_logger::JsonlConversationLogger;
pub use tracing_observer::TracingRunObserver;
