//! Run loop configuration from TOML (`[orchestration]` section)

use foundry_application::OrchestrationParams;
use foundry_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Run loop configuration from TOML
///
/// # Example
///
/// ```toml
/// [orchestration]
/// max_task_retries = 3        # attempts per task, including the first
/// max_review_reworks = 2      # rework rounds after a rejected review
/// review_file_char_cap = 3000 # characters of each file shown to reviewers
/// call_timeout_secs = 300
/// quick_check = false         # cheap reviewer check before each test
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestrationConfig {
    pub max_task_retries: u32,
    pub max_review_reworks: u32,
    pub review_file_char_cap: usize,
    pub call_timeout_secs: u64,
    pub quick_check: bool,
}

impl Default for FileOrchestrationConfig {
    fn default() -> Self {
        let params = OrchestrationParams::default();
        Self {
            max_task_retries: params.max_task_retries,
            max_review_reworks: params.max_review_reworks,
            review_file_char_cap: params.review_file_char_cap,
            call_timeout_secs: params.call_timeout.as_secs(),
            quick_check: params.quick_check,
        }
    }
}

impl FileOrchestrationConfig {
    /// Apply these settings onto `params`, returning validation issues.
    ///
    /// Zero values that would make a run useless are rejected and the
    /// default kept.
    pub fn apply(&self, params: OrchestrationParams) -> (OrchestrationParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut params = params
            .with_max_review_reworks(self.max_review_reworks)
            .with_quick_check(self.quick_check);

        if self.max_task_retries == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTaskRetries,
                format!(
                    "orchestration.max_task_retries cannot be 0, using {}",
                    params.max_task_retries
                ),
            ));
        } else {
            params = params.with_max_task_retries(self.max_task_retries);
        }

        if self.review_file_char_cap == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroFileCharCap,
                format!(
                    "orchestration.review_file_char_cap cannot be 0, using {}",
                    params.review_file_char_cap
                ),
            ));
        } else {
            params = params.with_review_file_char_cap(self.review_file_char_cap);
        }

        if self.call_timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroCallTimeout,
                format!(
                    "orchestration.call_timeout_secs cannot be 0, using {}",
                    params.call_timeout.as_secs()
                ),
            ));
        } else {
            params = params.with_call_timeout(Duration::from_secs(self.call_timeout_secs));
        }

        (params, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_params() {
        let (params, issues) =
            FileOrchestrationConfig::default().apply(OrchestrationParams::default());
        assert!(issues.is_empty());
        assert_eq!(params.max_task_retries, 3);
        assert_eq!(params.max_review_reworks, 2);
        assert_eq!(params.review_file_char_cap, 3000);
        assert_eq!(params.call_timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_zero_values_rejected() {
        let config = FileOrchestrationConfig {
            max_task_retries: 0,
            review_file_char_cap: 0,
            call_timeout_secs: 0,
            max_review_reworks: 0,
            quick_check: true,
        };
        let (params, issues) = config.apply(OrchestrationParams::default());
        assert_eq!(issues.len(), 3);
        assert_eq!(params.max_task_retries, 3);
        assert_eq!(params.review_file_char_cap, 3000);
        assert_eq!(params.call_timeout, Duration::from_secs(300));
        // Zero rework rounds is a valid choice
        assert_eq!(params.max_review_reworks, 0);
        assert!(params.quick_check);
    }
}
