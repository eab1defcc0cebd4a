//! Ports (interfaces) for external dependencies
//!
//! Ports define the boundaries between the application layer and
//! infrastructure. Adapters in the infrastructure layer implement them.

pub mod conversation_logger;
pub mod model_transport;
pub mod run_observer;

pub use conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
pub use model_transport::{ModelTransport, TransportError};
pub use run_observer::{NoRunObserver, RunObserver};
