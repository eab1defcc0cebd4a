//! Model transport configuration from TOML (`[transport]` section)

use foundry_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Child-process transport configuration.
///
/// The prompt is written to the command's stdin and the response read from
/// its stdout. `{model}` in `args` is replaced by the role's model id.
///
/// # Example
///
/// ```toml
/// [transport]
/// command = "llm"
/// args = ["-m", "{model}"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTransportConfig {
    pub command: String,
    pub args: Vec<String>,
}

impl Default for FileTransportConfig {
    fn default() -> Self {
        Self {
            command: "llm".to_string(),
            args: vec!["-m".to_string(), "{model}".to_string()],
        }
    }
}

impl FileTransportConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        if self.command.trim().is_empty() {
            return vec![ConfigIssue::error(
                ConfigIssueCode::EmptyTransportCommand,
                "transport.command cannot be empty",
            )];
        }
        vec![]
    }
}
