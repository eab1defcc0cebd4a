//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to application types,
//! reporting invalid values as [`ConfigIssue`]s instead of failing.

mod context;
mod logging;
mod models;
mod orchestration;
mod transport;

pub use context::FileContextConfig;
pub use logging::FileLoggingConfig;
pub use models::{DEFAULT_MODEL, FileModelsConfig};
pub use orchestration::FileOrchestrationConfig;
pub use transport::FileTransportConfig;

use foundry_application::{OrchestrationParams, RoleModels};
use foundry_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Role-based model selection
    pub models: FileModelsConfig,
    /// Compaction settings
    pub context: FileContextConfig,
    /// Run loop bounds
    pub orchestration: FileOrchestrationConfig,
    /// Child-process model transport
    pub transport: FileTransportConfig,
    /// Transcript and diagnostic log destinations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.role_models().1);
        issues.extend(self.orchestration_params().1);
        issues.extend(self.transport.validate());
        issues
    }

    /// Model per role, with invalid entries replaced by the default.
    pub fn role_models(&self) -> (RoleModels, Vec<ConfigIssue>) {
        self.models.to_role_models()
    }

    /// Run parameters from `[context]` and `[orchestration]`.
    pub fn orchestration_params(&self) -> (OrchestrationParams, Vec<ConfigIssue>) {
        let (policy, mut issues) = self.context.to_compaction_policy();
        let params = OrchestrationParams::default()
            .with_compaction(policy)
            .with_fallback_chars_per_message(self.context.fallback_chars_per_message);

        let (params, orchestration_issues) = self.orchestration.apply(params);
        issues.extend(orchestration_issues);
        (params, issues)
    }
}
