//! Plan and task entities.
//!
//! A [`ProjectPlan`] is created once by the Planner and then mutated in
//! place by the orchestrator as tasks progress. Task order is execution
//! order; nothing downstream reorders it.

use super::value_objects::TaskId;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Relative path → file content.
pub type FileSet = BTreeMap<String, String>;

/// Status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single unit of work within a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    /// Coder/Tester attempts made so far
    pub attempts: u32,
    /// Most recent failure (coder or tester), fed back on retry
    pub last_error: Option<String>,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            status: TaskStatus::Pending,
            attempts: 0,
            last_error: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn mark_in_progress(&mut self) {
        self.status = TaskStatus::InProgress;
    }

    pub fn mark_completed(&mut self) {
        self.status = TaskStatus::Completed;
        self.last_error = None;
    }

    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = TaskStatus::Failed;
        self.last_error = Some(error.into());
    }

    /// Count one failed attempt, keeping the task in progress.
    pub fn record_attempt_failure(&mut self, error: impl Into<String>) {
        self.attempts += 1;
        self.last_error = Some(error.into());
    }

    /// Description used in prompts: the title plus details when present.
    pub fn brief(&self) -> String {
        if self.description.is_empty() {
            self.title.clone()
        } else {
            format!("{}: {}", self.title, self.description)
        }
    }
}

/// Output of the Planner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPlan {
    pub project_name: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub design_doc: String,
    pub file_tree: Vec<String>,
    pub tasks: Vec<Task>,
}

impl ProjectPlan {
    pub fn new(project_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            description: description.into(),
            tech_stack: Vec::new(),
            design_doc: String::new(),
            file_tree: Vec::new(),
            tasks: Vec::new(),
        }
    }

    /// Append a task and return the id it was stored under.
    ///
    /// Ids stay unique: an id already in the plan gets a `-2`, `-3`, ...
    /// suffix, otherwise lookups by id would only ever reach the first task.
    pub fn add_task(&mut self, mut task: Task) -> TaskId {
        if self.task(&task.id).is_some() {
            let base = task.id.as_str().to_string();
            let mut n = 2;
            while self.task(&TaskId::new(format!("{}-{}", base, n))).is_some() {
                n += 1;
            }
            task.id = TaskId::new(format!("{}-{}", base, n));
        }
        let id = task.id.clone();
        self.tasks.push(task);
        id
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn task_mut(&mut self, id: &TaskId) -> Result<&mut Task, DomainError> {
        self.tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| DomainError::UnknownTask(id.to_string()))
    }

    /// Ids of tasks not yet attempted, in plan order.
    pub fn pending_task_ids(&self) -> Vec<TaskId> {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Pending)
            .map(|t| t.id.clone())
            .collect()
    }

    pub fn count_with_status(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|t| t.status == status).count()
    }

    pub fn is_finished(&self) -> bool {
        self.tasks.iter().all(|t| t.status.is_terminal())
    }

    /// Markdown checklist of task completion.
    pub fn checklist(&self) -> String {
        self.tasks
            .iter()
            .map(|task| {
                let mark = if task.status == TaskStatus::Completed {
                    "x"
                } else {
                    " "
                };
                format!("- [{}] {}. {} ({})", mark, task.id, task.title, task.status)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> ProjectPlan {
        let mut plan = ProjectPlan::new("todo", "A todo app");
        plan.add_task(Task::new("1", "Scaffold"));
        plan.add_task(Task::new("2", "Add API").with_description("REST endpoints"));
        plan
    }

    #[test]
    fn test_status_transitions() {
        let mut task = Task::new("1", "Scaffold");
        assert_eq!(task.status, TaskStatus::Pending);
        task.mark_in_progress();
        task.record_attempt_failure("tests failed");
        assert_eq!(task.attempts, 1);
        assert_eq!(task.status, TaskStatus::InProgress);
        task.mark_completed();
        assert!(task.status.is_terminal());
        assert!(task.last_error.is_none());
    }

    #[test]
    fn test_add_task_keeps_ids_unique() {
        let mut plan = plan();
        assert_eq!(plan.add_task(Task::new("2", "Docs")), TaskId::new("2-2"));
        assert_eq!(plan.add_task(Task::new("2", "CI")), TaskId::new("2-3"));
        assert_eq!(plan.add_task(Task::new("3", "Release")), TaskId::new("3"));

        let pending = plan.pending_task_ids();
        assert_eq!(pending.len(), 5);
        assert_eq!(plan.task(&TaskId::new("2-3")).unwrap().title, "CI");
    }

    #[test]
    fn test_task_mut_unknown_id() {
        let mut plan = plan();
        assert!(plan.task_mut(&TaskId::new("2")).is_ok());
        let err = plan.task_mut(&TaskId::new("9")).unwrap_err();
        assert!(matches!(err, DomainError::UnknownTask(id) if id == "9"));
    }

    #[test]
    fn test_pending_and_checklist() {
        let mut plan = plan();
        plan.tasks[0].mark_completed();
        assert_eq!(plan.pending_task_ids(), vec![TaskId::new("2")]);
        assert!(!plan.is_finished());

        let checklist = plan.checklist();
        assert!(checklist.contains("- [x] 1. Scaffold (completed)"));
        assert!(checklist.contains("- [ ] 2. Add API (pending)"));

        plan.tasks[1].mark_failed("gave up");
        assert!(plan.is_finished());
        assert_eq!(plan.count_with_status(TaskStatus::Failed), 1);
    }

    #[test]
    fn test_brief() {
        let plan = plan();
        assert_eq!(plan.tasks[0].brief(), "Scaffold");
        assert_eq!(plan.tasks[1].brief(), "Add API: REST endpoints");
    }
}
