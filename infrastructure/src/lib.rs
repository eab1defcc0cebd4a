//! Infrastructure layer for code-foundry
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration file loading and the
//! filesystem boundary for file sets.

pub mod config;
pub mod files;
pub mod logging;
pub mod transport;

// Re-export commonly used types
pub use config::{
    ConfigLoader, DEFAULT_MODEL, FileConfig, FileContextConfig, FileLoggingConfig,
    FileModelsConfig, FileOrchestrationConfig, FileTransportConfig,
};
pub use files::{FileSetStore, FileStoreError};
pub use logging::{JsonlConversationLogger, TracingRunObserver};
pub use transport::{MODEL_PLACEHOLDER, ProcessTransport};
