//! Model transport adapters

mod process;

pub use process::{MODEL_PLACEHOLDER, ProcessTransport};
