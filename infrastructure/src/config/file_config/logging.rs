//! Log output configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where logs go besides stderr.
///
/// # Example
///
/// ```toml
/// [logging]
/// conversation_log = "runs/latest.conversation.jsonl"
/// file = "logs"   # daily-rotated diagnostic log directory
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of every agent call, compaction and verdict
    pub conversation_log: Option<PathBuf>,
    /// Directory for the rotated diagnostic log
    pub file: Option<PathBuf>,
}
