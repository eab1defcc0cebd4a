//! Prompt templates for the agent roles
//!
//! Every template asks for a single JSON object so the response can be
//! recovered by [`ResponseParser`](crate::parsing::ResponseParser).

use crate::agent::{AgentRole, FileSet, ProjectPlan, Task};
use crate::core::string::head_chars;
use std::collections::BTreeMap;

/// Templates for generating agent prompts
pub struct AgentPromptTemplate;

impl AgentPromptTemplate {
    /// Base round trip: a role instruction, the task, and a sorted context section.
    pub fn process_task(
        role_instruction: &str,
        task: &str,
        context: &BTreeMap<String, String>,
    ) -> String {
        let mut prompt = format!("{}\n\n## Task\n\n{}\n", role_instruction, task);
        if !context.is_empty() {
            prompt.push_str("\n## Context\n");
            for (key, value) in context {
                prompt.push_str(&format!("\n### {}\n\n{}\n", key, value));
            }
        }
        prompt
    }

    /// Standing instruction for each role
    pub fn role_instruction(role: AgentRole) -> &'static str {
        match role {
            AgentRole::Planner => {
                "You are a senior software architect. You turn project requests into a concrete design and an ordered list of implementation tasks."
            }
            AgentRole::Coder => {
                "You are an expert software engineer. You write complete, working source files for one task at a time."
            }
            AgentRole::Tester => {
                "You are a meticulous QA engineer. You inspect source files and decide whether they satisfy the task they were written for."
            }
            AgentRole::Reviewer => {
                "You are a principal engineer performing the final review of a delivered project against its original request."
            }
            AgentRole::Summarizer => {
                "You compress engineering conversations into short, faithful summaries without losing concrete facts."
            }
        }
    }

    /// Prompt for the planning phase
    pub fn planning(request: &str) -> String {
        format!(
            r#"## Project Request

{request}

## Instructions

Design the project and break it into implementation tasks.

- Order tasks so dependencies come first (scaffolding and configuration before feature code, features before tests and docs).
- Each task must be small enough to implement in one response.
- List every file the finished project should contain in `fileTree`.

Respond with a single JSON object:

```json
{{
  "projectName": "short-kebab-name",
  "description": "one paragraph",
  "techStack": ["language", "framework"],
  "designDoc": "architecture and key decisions (markdown)",
  "fileTree": ["relative/path.ext"],
  "tasks": [
    {{"id": "1", "title": "short title", "description": "what to build"}}
  ]
}}
```"#
        )
    }

    /// Prompt for implementing one task
    pub fn coding(
        task: &Task,
        plan: &ProjectPlan,
        files: &FileSet,
        feedback: Option<&str>,
        file_char_cap: usize,
    ) -> String {
        let mut prompt = format!(
            "## Current Task\n\n{}. {}\n\n{}\n\n## Project\n\n{}: {}\n\nExpected file tree:\n{}\n",
            task.id,
            task.title,
            task.description,
            plan.project_name,
            plan.description,
            bullet_list(&plan.file_tree),
        );

        if !files.is_empty() {
            prompt.push_str("\n## Existing Files\n\n");
            prompt.push_str(&render_files(files, file_char_cap));
        }

        if let Some(feedback) = feedback
            && !feedback.trim().is_empty()
        {
            prompt.push_str(&format!(
                "\n## Previous Attempt Failed\n\n{}\n\nFix these problems in this attempt.\n",
                feedback
            ));
        }

        prompt.push_str(
            r#"
## Instructions

Write the complete content of every file this task creates or changes.

Respond with a single JSON object:

```json
{
  "files": [{"path": "relative/path.ext", "content": "full file content"}],
  "notes": "short explanation"
}
```"#,
        );
        prompt
    }

    /// Prompt for testing one task's files
    pub fn testing(task: &Task, files: &FileSet, file_char_cap: usize) -> String {
        format!(
            r#"## Task Under Test

{id}. {brief}

## Files

{files}
## Instructions

Check that the files implement the task completely and correctly: syntax, missing imports, unimplemented stubs, and obvious logic errors.

Respond with a single JSON object:

```json
{{"passed": true, "summary": "one sentence", "failures": ["problem description"]}}
```"#,
            id = task.id,
            brief = task.brief(),
            files = render_files(files, file_char_cap),
        )
    }

    /// Prompt for the final project review
    pub fn review(
        request: &str,
        plan: &ProjectPlan,
        files: &FileSet,
        test_results: &[String],
        file_char_cap: usize,
    ) -> String {
        let tests = if test_results.is_empty() {
            "No test results recorded.".to_string()
        } else {
            bullet_list(test_results)
        };

        format!(
            r#"## Original Request

{request}

## Design Document

{design}

## Expected File Tree

{tree}

## Task Completion

{checklist}

## Test Results

{tests}

## Delivered Files

{files}
## Instructions

Decide whether the delivered project satisfies the original request. Approve only if it is complete and would work as described.

Respond with a single JSON object:

```json
{{
  "approved": false,
  "completionPercentage": 0,
  "requirementsCoverage": [{{"requirement": "text", "met": true, "note": ""}}],
  "codeQuality": {{"score": 0, "strengths": [], "weaknesses": []}},
  "missingItems": ["what still needs to be built"],
  "blockers": ["what prevents delivery"],
  "summary": "overall assessment"
}}
```"#,
            design = if plan.design_doc.is_empty() {
                "(none)"
            } else {
                plan.design_doc.as_str()
            },
            tree = bullet_list(&plan.file_tree),
            checklist = plan.checklist(),
            files = render_files(files, file_char_cap),
        )
    }

    /// Prompt for a cheap sanity check on one task's output
    pub fn quick_check(task_title: &str, files: &FileSet, file_char_cap: usize) -> String {
        format!(
            r#"## Quick Check

Task: {task_title}

{files}
Is this output plausible for the task? Look only for glaring problems.

Respond with a single JSON object:

```json
{{"ok": true, "issues": []}}
```"#,
            files = render_files(files, file_char_cap),
        )
    }

    /// Prompt for compacting conversation history
    pub fn summarization(transcript: &str) -> String {
        format!(
            r#"## Conversation To Summarize

{transcript}

## Instructions

Summarize the conversation above so it can replace the original messages. You MUST preserve:
- every file path that was created or modified
- every technology choice
- every decision that is still outstanding or constrains future work

Be concise. Respond with a single JSON object:

```json
{{
  "summary": "prose summary",
  "keyFacts": ["fact"],
  "filesCreated": ["relative/path.ext"],
  "techStack": ["technology"]
}}
```"#
        )
    }

    /// Prompt for the final delivery report
    pub fn delivery_report(plan: &ProjectPlan, review_json: &str, files: &FileSet) -> String {
        let paths: Vec<String> = files.keys().cloned().collect();
        format!(
            r#"## Project

{name}: {description}

## Review

```json
{review_json}
```

## Files

{paths}

## Instructions

Write a concise markdown delivery report for the user: what was built, the review verdict with completion percentage and quality score, requirement coverage as a checklist, and known gaps. Respond with the markdown only."#,
            name = plan.project_name,
            description = plan.description,
            paths = bullet_list(&paths),
        )
    }
}

/// Render files for a prompt, cutting each at `cap` characters.
pub fn render_files(files: &FileSet, cap: usize) -> String {
    let mut out = String::new();
    for (path, content) in files {
        let (head, cut) = head_chars(content, cap);
        out.push_str(&format!("### {}\n\n```\n{}", path, head));
        if cut {
            out.push_str("\n... (truncated)");
        }
        out.push_str("\n```\n\n");
    }
    out
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return "(none)".to_string();
    }
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> ProjectPlan {
        let mut plan = ProjectPlan::new("todo", "A todo app");
        plan.design_doc = "Keep it small.".to_string();
        plan.file_tree = vec!["src/main.rs".to_string()];
        plan.add_task(Task::new("1", "Scaffold"));
        plan
    }

    #[test]
    fn test_process_task_sorts_context() {
        let mut context = BTreeMap::new();
        context.insert("zeta".to_string(), "last".to_string());
        context.insert("alpha".to_string(), "first".to_string());
        let prompt = AgentPromptTemplate::process_task("You are X.", "Do Y", &context);
        let alpha = prompt.find("### alpha").unwrap();
        let zeta = prompt.find("### zeta").unwrap();
        assert!(alpha < zeta);
        assert!(prompt.starts_with("You are X."));
    }

    #[test]
    fn test_every_role_has_instruction() {
        for role in [
            AgentRole::Planner,
            AgentRole::Coder,
            AgentRole::Tester,
            AgentRole::Reviewer,
            AgentRole::Summarizer,
        ] {
            assert!(!AgentPromptTemplate::role_instruction(role).is_empty());
        }
    }

    #[test]
    fn test_process_task_without_context() {
        let prompt = AgentPromptTemplate::process_task("R", "T", &BTreeMap::new());
        assert!(!prompt.contains("## Context"));
    }

    #[test]
    fn test_render_files_marks_truncation() {
        let mut files = FileSet::new();
        files.insert("big.rs".to_string(), "x".repeat(50));
        files.insert("small.rs".to_string(), "fn f() {}".to_string());
        let rendered = render_files(&files, 10);
        assert!(rendered.contains(&format!("{}\n... (truncated)", "x".repeat(10))));
        assert!(!rendered.contains(&"x".repeat(11)));
        assert_eq!(rendered.matches("(truncated)").count(), 1);
    }

    #[test]
    fn test_review_prompt_embeds_everything() {
        let mut files = FileSet::new();
        files.insert("src/main.rs".to_string(), "fn main() {}".to_string());
        let prompt = AgentPromptTemplate::review(
            "Build a todo app",
            &plan(),
            &files,
            &["Task 1 (Scaffold): passed".to_string()],
            3000,
        );
        assert!(prompt.contains("Build a todo app"));
        assert!(prompt.contains("Keep it small."));
        assert!(prompt.contains("- [ ] 1. Scaffold (pending)"));
        assert!(prompt.contains("Task 1 (Scaffold): passed"));
        assert!(prompt.contains("### src/main.rs"));
    }

    #[test]
    fn test_coding_includes_feedback() {
        let plan = plan();
        let prompt = AgentPromptTemplate::coding(
            &plan.tasks[0],
            &plan,
            &FileSet::new(),
            Some("missing main function"),
            3000,
        );
        assert!(prompt.contains("## Previous Attempt Failed"));
        assert!(prompt.contains("missing main function"));
        assert!(!prompt.contains("## Existing Files"));
    }
}
