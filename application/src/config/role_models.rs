//! Model selection per agent role.

use foundry_domain::AgentRole;

/// Which model each role calls.
///
/// Roles without an override use `default`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleModels {
    pub default: String,
    pub planner: Option<String>,
    pub coder: Option<String>,
    pub tester: Option<String>,
    pub reviewer: Option<String>,
    pub summarizer: Option<String>,
}

impl RoleModels {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            planner: None,
            coder: None,
            tester: None,
            reviewer: None,
            summarizer: None,
        }
    }

    pub fn with_override(mut self, role: AgentRole, model: impl Into<String>) -> Self {
        let model = Some(model.into());
        match role {
            AgentRole::Planner => self.planner = model,
            AgentRole::Coder => self.coder = model,
            AgentRole::Tester => self.tester = model,
            AgentRole::Reviewer => self.reviewer = model,
            AgentRole::Summarizer => self.summarizer = model,
        }
        self
    }

    pub fn model_for(&self, role: AgentRole) -> &str {
        let model = match role {
            AgentRole::Planner => &self.planner,
            AgentRole::Coder => &self.coder,
            AgentRole::Tester => &self.tester,
            AgentRole::Reviewer => &self.reviewer,
            AgentRole::Summarizer => &self.summarizer,
        };
        model.as_deref().unwrap_or(&self.default)
    }

    /// Model whose context window bounds the rolling conversation.
    ///
    /// The coder sees the most history, so its window is the budget.
    pub fn conversation_model(&self) -> &str {
        self.model_for(AgentRole::Coder)
    }
}
