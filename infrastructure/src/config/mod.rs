//! Configuration file loading for code-foundry
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./foundry.toml` or `./.foundry.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/code-foundry/config.toml`
//!    (fallback: `~/.config/code-foundry/config.toml`)
//! 4. Default values

mod file_config;
mod loader;

pub use file_config::{
    DEFAULT_MODEL, FileConfig, FileContextConfig, FileLoggingConfig, FileModelsConfig,
    FileOrchestrationConfig, FileTransportConfig,
};
pub use loader::ConfigLoader;
