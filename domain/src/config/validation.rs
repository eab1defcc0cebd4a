//! Configuration validation issues.
//!
//! Invalid settings never abort a run: the loader reports a
//! [`ConfigIssue`] and falls back to the built-in default for that value.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The value was rejected and replaced by its default.
    Error,
    /// The value is accepted but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `compaction_threshold` outside (0, 100].
    ThresholdOutOfRange,
    /// `max_task_retries` of zero would never attempt a task.
    ZeroTaskRetries,
    /// `review_file_char_cap` of zero hides every file from the reviewer.
    ZeroFileCharCap,
    /// `call_timeout_secs` of zero fails every model call.
    ZeroCallTimeout,
    /// A `[models]` entry is blank.
    EmptyModelName,
    /// Model id not in the registry; the conservative default window applies.
    UnknownModel,
    /// `[transport] command` is empty.
    EmptyTransportCommand,
}

/// A detected issue in the loaded configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}
