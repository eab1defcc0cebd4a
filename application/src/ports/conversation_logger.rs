//! Port for the machine-readable run transcript.
//!
//! [`ConversationLogger`] records every prompt, response, compaction and
//! verdict as a structured event. `tracing` carries the human-readable
//! diagnostics; this port carries the full transcript (JSONL in the
//! infrastructure adapter).

use serde_json::Value;

/// A structured transcript event.
pub struct ConversationEvent {
    /// Event type identifier (e.g. "agent_call", "compaction", "review").
    pub event_type: &'static str,
    /// Event-specific fields.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for recording transcript events.
///
/// `log` is synchronous and infallible so a broken log sink never
/// interrupts a run.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when the transcript is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
