//! Context budget configuration from TOML (`[context]` section)

use foundry_domain::context::summary::DEFAULT_FALLBACK_CHARS;
use foundry_domain::{CompactionPolicy, ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Context budget configuration from TOML.
///
/// Controls when conversation history is compacted and how much of it
/// stays verbatim.
///
/// # Example
///
/// ```toml
/// [context]
/// compaction_threshold = 80.0       # percent of the usable window
/// summary_keep_recent = 4           # newest messages kept raw
/// fallback_chars_per_message = 200  # used when the summarizer fails
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileContextConfig {
    pub compaction_threshold: f64,
    pub summary_keep_recent: usize,
    pub fallback_chars_per_message: usize,
}

impl Default for FileContextConfig {
    fn default() -> Self {
        let policy = CompactionPolicy::default();
        Self {
            compaction_threshold: policy.threshold_percent(),
            summary_keep_recent: policy.keep_recent(),
            fallback_chars_per_message: DEFAULT_FALLBACK_CHARS,
        }
    }
}

impl FileContextConfig {
    /// Convert to a domain [`CompactionPolicy`], returning validation issues.
    ///
    /// An out-of-range threshold falls back to the default threshold; the
    /// configured `summary_keep_recent` is kept either way.
    pub fn to_compaction_policy(&self) -> (CompactionPolicy, Vec<ConfigIssue>) {
        match CompactionPolicy::try_new(self.compaction_threshold, self.summary_keep_recent) {
            Ok(policy) => (policy, vec![]),
            Err(e) => {
                let fallback = CompactionPolicy::default().with_keep_recent(self.summary_keep_recent);
                let issue = ConfigIssue::error(
                    ConfigIssueCode::ThresholdOutOfRange,
                    format!(
                        "context.compaction_threshold: {}, using {}",
                        e,
                        fallback.threshold_percent()
                    ),
                );
                (fallback, vec![issue])
            }
        }
    }
}
