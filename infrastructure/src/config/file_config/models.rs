//! Role-based model configuration from TOML (`[models]` section)

use foundry_application::RoleModels;
use foundry_domain::{AgentRole, ConfigIssue, ConfigIssueCode, ModelConfigRegistry};
use serde::{Deserialize, Serialize};

/// Model used when `[models] default` is absent or empty.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4.5";

/// Role-based model configuration from TOML
///
/// # Example
///
/// ```toml
/// [models]
/// default = "claude-sonnet-4.5"   # Every role without an override
/// reviewer = "claude-opus-4.5"    # Final review and delivery report
/// summarizer = "gpt-4o-mini"      # History compaction
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    pub default: String,
    pub planner: Option<String>,
    pub coder: Option<String>,
    pub tester: Option<String>,
    pub reviewer: Option<String>,
    pub summarizer: Option<String>,
}

impl Default for FileModelsConfig {
    fn default() -> Self {
        Self {
            default: DEFAULT_MODEL.to_string(),
            planner: None,
            coder: None,
            tester: None,
            reviewer: None,
            summarizer: None,
        }
    }
}

impl FileModelsConfig {
    /// Convert to [`RoleModels`], returning validation issues.
    ///
    /// Empty names are dropped (the role uses the default model). Unknown
    /// ids are kept but reported, since they get the conservative 8k window.
    pub fn to_role_models(&self) -> (RoleModels, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let default = match Self::check("default", Some(&self.default), &mut issues) {
            Some(model) => model,
            None => DEFAULT_MODEL.to_string(),
        };
        let mut models = RoleModels::new(default);

        let overrides = [
            (AgentRole::Planner, &self.planner),
            (AgentRole::Coder, &self.coder),
            (AgentRole::Tester, &self.tester),
            (AgentRole::Reviewer, &self.reviewer),
            (AgentRole::Summarizer, &self.summarizer),
        ];
        for (role, value) in overrides {
            if let Some(model) = Self::check(role.as_str(), value.as_ref(), &mut issues) {
                models = models.with_override(role, model);
            }
        }

        (models, issues)
    }

    fn check(
        field: &str,
        value: Option<&String>,
        issues: &mut Vec<ConfigIssue>,
    ) -> Option<String> {
        let value = value?.trim();
        if value.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyModelName,
                format!("models.{}: model name cannot be empty", field),
            ));
            return None;
        }
        if !ModelConfigRegistry::is_known(value) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnknownModel,
                format!(
                    "models.{}: unknown model '{}', assuming an 8192-token window",
                    field, value
                ),
            ));
        }
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundry_domain::Severity;

    #[test]
    fn test_default_models() {
        let (models, issues) = FileModelsConfig::default().to_role_models();
        assert!(issues.is_empty());
        assert_eq!(models.model_for(AgentRole::Coder), DEFAULT_MODEL);
    }

    #[test]
    fn test_overrides_applied() {
        let config = FileModelsConfig {
            reviewer: Some("claude-opus-4.5".to_string()),
            ..Default::default()
        };
        let (models, issues) = config.to_role_models();
        assert!(issues.is_empty());
        assert_eq!(models.model_for(AgentRole::Reviewer), "claude-opus-4.5");
        assert_eq!(models.model_for(AgentRole::Planner), DEFAULT_MODEL);
    }

    #[test]
    fn test_empty_name_is_error_and_dropped() {
        let config = FileModelsConfig {
            default: "  ".to_string(),
            tester: Some(String::new()),
            ..Default::default()
        };
        let (models, issues) = config.to_role_models();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.severity == Severity::Error));
        assert_eq!(models.model_for(AgentRole::Tester), DEFAULT_MODEL);
    }

    #[test]
    fn test_unknown_model_is_warning() {
        let config = FileModelsConfig {
            default: "my-local-llama".to_string(),
            ..Default::default()
        };
        let (models, issues) = config.to_role_models();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].code, ConfigIssueCode::UnknownModel);
        assert_eq!(models.default, "my-local-llama");
    }
}
