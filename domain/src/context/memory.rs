//! Durable project memory.
//!
//! [`ProjectMemory`] holds the facts that must survive compaction and hard
//! truncation: project header, technology stack, decisions and the log of
//! touched files. It is append-only except for a full reset at run start.

use super::token_estimator::TokenEstimator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Pinned project facts (never compacted away)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMemory {
    project_name: String,
    description: String,
    tech_stack: BTreeSet<String>,
    decisions: Vec<String>,
    files_touched: Vec<String>,
}

impl ProjectMemory {
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tech_stack(&self) -> &BTreeSet<String> {
        &self.tech_stack
    }

    pub fn decisions(&self) -> &[String] {
        &self.decisions
    }

    pub fn files_touched(&self) -> &[String] {
        &self.files_touched
    }

    /// Replace the header fields. Calling twice with the same values is a no-op.
    pub(crate) fn set_info<I, S>(&mut self, name: &str, description: &str, tech_stack: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.project_name = name.to_string();
        self.description = description.to_string();
        self.tech_stack = tech_stack.into_iter().map(Into::into).collect();
    }

    pub(crate) fn add_decision(&mut self, text: impl Into<String>) {
        self.decisions.push(text.into());
    }

    /// Log a touched file. Duplicates are kept: this is a log, not a map.
    pub(crate) fn add_file(&mut self, path: impl Into<String>) {
        self.files_touched.push(path.into());
    }

    /// Token cost of the canonical JSON rendering.
    pub fn token_size(&self) -> usize {
        let rendered = serde_json::to_string(self).unwrap_or_default();
        TokenEstimator::estimate(&rendered)
    }

    /// Render as a prompt section pinned ahead of the conversation.
    pub fn to_prompt_section(&self) -> String {
        let mut out = String::from("## Project Memory\n\n");

        if !self.project_name.is_empty() {
            out.push_str(&format!("Project: {}\n", self.project_name));
        }
        if !self.description.is_empty() {
            out.push_str(&format!("Description: {}\n", self.description));
        }
        if !self.tech_stack.is_empty() {
            let stack: Vec<&str> = self.tech_stack.iter().map(String::as_str).collect();
            out.push_str(&format!("Tech stack: {}\n", stack.join(", ")));
        }
        if !self.decisions.is_empty() {
            out.push_str("\nDecisions:\n");
            for decision in &self.decisions {
                out.push_str(&format!("- {}\n", decision));
            }
        }
        if !self.files_touched.is_empty() {
            out.push_str("\nFiles touched:\n");
            for path in &self.files_touched {
                out.push_str(&format!("- {}\n", path));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_info_is_idempotent() {
        let mut memory = ProjectMemory::default();
        memory.set_info("todo-api", "A todo service", ["rust", "axum"]);
        let first = memory.clone();
        memory.set_info("todo-api", "A todo service", ["rust", "axum"]);
        assert_eq!(memory, first);
        assert_eq!(memory.tech_stack().len(), 2);
    }

    #[test]
    fn test_files_are_a_log() {
        let mut memory = ProjectMemory::default();
        memory.add_file("src/main.rs");
        memory.add_file("src/main.rs");
        assert_eq!(memory.files_touched(), ["src/main.rs", "src/main.rs"]);
    }

    #[test]
    fn test_token_size_grows_with_content() {
        let mut memory = ProjectMemory::default();
        let empty = memory.token_size();
        memory.add_decision("Use SQLite for storage");
        assert!(memory.token_size() > empty);
    }

    #[test]
    fn test_prompt_section_lists_facts() {
        let mut memory = ProjectMemory::default();
        memory.set_info("todo-api", "A todo service", ["rust"]);
        memory.add_decision("REST over gRPC");
        memory.add_file("src/lib.rs");

        let section = memory.to_prompt_section();
        assert!(section.contains("Project: todo-api"));
        assert!(section.contains("Tech stack: rust"));
        assert!(section.contains("- REST over gRPC"));
        assert!(section.contains("- src/lib.rs"));
    }
}
