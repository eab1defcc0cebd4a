//! Agent value objects: immutable results of one call-and-parse cycle.
//!
//! # Identifiers
//! - [`TaskId`] - identifier of a task within a plan
//! - [`AgentRole`] - which specialized agent produced a result
//!
//! # Results
//! - [`AgentOutcome`] - raw `{success, content, error}` of a round trip
//! - [`CodeProposal`] - files proposed by the Coder
//! - [`TestReport`] - verdict from the Tester
//! - [`QuickCheckResult`] - cheap mid-pipeline sanity check

use crate::parsing::fields::{bool_field, string_field, string_list};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a task within a plan.
///
/// Planner tasks are numbered sequentially ("1", "2", ...); rework tasks
/// appended after a rejected review use `rework-<round>-<n>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of the `n`-th task created by review round `round`.
    pub fn rework(round: u32, n: usize) -> Self {
        Self(format!("rework-{}-{}", round, n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_rework(&self) -> bool {
        self.0.starts_with("rework-")
    }
}

impl<T: Into<String>> From<T> for TaskId {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role-specialized agent kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Planner,
    Coder,
    Tester,
    Reviewer,
    Summarizer,
}

impl AgentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Planner => "planner",
            AgentRole::Coder => "coder",
            AgentRole::Tester => "tester",
            AgentRole::Reviewer => "reviewer",
            AgentRole::Summarizer => "summarizer",
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a single request/response round trip.
///
/// Transport failures are carried here as data, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentOutcome {
    pub success: bool,
    pub content: String,
    pub error: Option<String>,
}

impl AgentOutcome {
    pub fn succeeded(content: impl Into<String>) -> Self {
        Self {
            success: true,
            content: content.into(),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: String::new(),
            error: Some(error.into()),
        }
    }

    /// Failure description, or a generic one when none was recorded.
    pub fn error_message(&self) -> String {
        self.error
            .clone()
            .unwrap_or_else(|| "model call failed".to_string())
    }
}

/// One file written by the Coder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub content: String,
}

/// Files proposed for a single task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeProposal {
    pub files: Vec<FileChange>,
    pub notes: String,
}

impl CodeProposal {
    /// Parse `{"files": [{"path", "content"}], "notes"}`.
    ///
    /// Entries without a path are skipped. Returns `None` when no file
    /// remains, since an empty proposal cannot complete a task.
    pub fn from_json(json: &Value) -> Option<Self> {
        let files: Vec<FileChange> = json
            .get("files")?
            .as_array()?
            .iter()
            .filter_map(|entry| {
                let path = entry.get("path")?.as_str()?.trim();
                if path.is_empty() {
                    return None;
                }
                let content = entry
                    .get("content")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                Some(FileChange {
                    path: path.to_string(),
                    content: content.to_string(),
                })
            })
            .collect();

        if files.is_empty() {
            return None;
        }

        Some(Self {
            files,
            notes: string_field(json, "notes"),
        })
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.path.as_str())
    }
}

/// Tester verdict for a task's files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestReport {
    pub passed: bool,
    pub summary: String,
    pub failures: Vec<String>,
}

impl TestReport {
    /// Parse `{"passed", "summary", "failures"}`. `passed` is required.
    pub fn from_json(json: &Value) -> Option<Self> {
        Some(Self {
            passed: bool_field(json, "passed")?,
            summary: string_field(json, "summary"),
            failures: string_list(json, "failures"),
        })
    }

    /// A failing report explaining why no verdict was obtained.
    pub fn failed(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            passed: false,
            summary: format!("Tests could not be evaluated: {}", reason),
            failures: vec![reason],
        }
    }

    /// Feedback passed to the Coder on the next attempt.
    pub fn feedback(&self) -> String {
        let mut out = self.summary.clone();
        for failure in &self.failures {
            out.push_str(&format!("\n- {}", failure));
        }
        out
    }
}

/// Outcome of a cheap sanity check on a task's files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickCheckResult {
    pub ok: bool,
    pub issues: Vec<String>,
}

impl QuickCheckResult {
    pub fn from_json(json: &Value) -> Option<Self> {
        Some(Self {
            ok: bool_field(json, "ok")?,
            issues: string_list(json, "issues"),
        })
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            issues: vec![reason.into()],
        }
    }
}
