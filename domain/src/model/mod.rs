//! Model catalogue: context window sizes and output reservations.

pub mod registry;

pub use registry::{ModelConfig, ModelConfigRegistry, ModelProvider};
