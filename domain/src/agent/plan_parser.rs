//! Plan parsing from Planner responses.
//!
//! The response goes through the shared [`ResponseParser`] chain first, so a
//! plan wrapped in prose or a fenced block is recovered the same way as a
//! bare JSON document.

use super::entities::{ProjectPlan, Task};
use crate::core::error::DomainError;
use crate::parsing::fields::{string_field, string_list, value_to_string};
use crate::parsing::{Parsed, ResponseParser};
use serde_json::Value;

/// Parse a plan from Planner response text.
///
/// Fails with [`DomainError::UnparseablePlan`] when no JSON object is found
/// and [`DomainError::EmptyPlan`] when the plan has no tasks.
pub fn parse_plan(response: &str) -> Result<ProjectPlan, DomainError> {
    match ResponseParser::parse_value(response) {
        Parsed::Parsed(json) => parse_plan_json(&json),
        Parsed::Unparsed => Err(DomainError::UnparseablePlan),
    }
}

/// Parse a plan from a JSON value.
///
/// Expected schema:
/// ```json
/// {
///   "projectName": "string",
///   "description": "string",
///   "techStack": ["string"],
///   "designDoc": "string",
///   "fileTree": ["path"],
///   "tasks": [{ "id": "string", "title": "string", "description": "string" }]
/// }
/// ```
///
/// Every field except `tasks` is optional. Tasks without an id are numbered
/// by position; tasks without a title fall back to their description. A
/// repeated id is suffixed so every task stays addressable.
pub fn parse_plan_json(json: &Value) -> Result<ProjectPlan, DomainError> {
    if !json.is_object() {
        return Err(DomainError::UnparseablePlan);
    }

    let tasks = json
        .get("tasks")
        .and_then(Value::as_array)
        .ok_or(DomainError::EmptyPlan)?;

    let mut plan = ProjectPlan::new(
        string_field(json, "projectName"),
        string_field(json, "description"),
    );
    plan.tech_stack = string_list(json, "techStack");
    plan.design_doc = string_field(json, "designDoc");
    plan.file_tree = string_list(json, "fileTree");

    for (index, task_json) in tasks.iter().enumerate() {
        let id = task_json
            .get("id")
            .and_then(value_to_string)
            .unwrap_or_else(|| format!("{}", index + 1));
        let description = string_field(task_json, "description");
        let title = task_json
            .get("title")
            .and_then(value_to_string)
            .or_else(|| (!description.is_empty()).then(|| description.clone()))
            .unwrap_or_else(|| format!("Task {}", index + 1));

        plan.add_task(Task::new(id, title).with_description(description));
    }

    if plan.tasks.is_empty() {
        return Err(DomainError::EmptyPlan);
    }

    Ok(plan)
}
