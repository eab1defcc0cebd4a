//! Delivery report.
//!
//! A report always exists at the end of a run: the model-written one when
//! it is non-empty, otherwise [`DeliveryReport::render_default`].

use crate::agent::{ProjectPlan, ReviewResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub content: String,
    /// `false` when the deterministic template was used
    pub model_generated: bool,
}

impl DeliveryReport {
    /// Accept a model-written report if it has any content.
    pub fn from_model(content: &str) -> Option<Self> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }
        Some(Self {
            content: content.to_string(),
            model_generated: true,
        })
    }

    /// Deterministic template with the fixed minimal shape.
    pub fn render_default(plan: &ProjectPlan, review: &ReviewResult) -> Self {
        let mut out = format!(
            "# Delivery Report: {}\n\nApproved: {}\nCompletion: {}%\nQuality score: {}/100\n",
            plan.project_name,
            if review.approved { "yes" } else { "no" },
            review.completion_percentage,
            review.code_quality.score,
        );

        out.push_str("\n## Requirements\n\n");
        if review.requirements_coverage.is_empty() {
            out.push_str("(no requirements assessed)\n");
        }
        for coverage in &review.requirements_coverage {
            let mark = if coverage.met { "x" } else { " " };
            out.push_str(&format!("- [{}] {}", mark, coverage.requirement));
            if !coverage.note.is_empty() {
                out.push_str(&format!(" ({})", coverage.note));
            }
            out.push('\n');
        }

        if !plan.tasks.is_empty() {
            out.push_str("\n## Tasks\n\n");
            out.push_str(&plan.checklist());
            out.push('\n');
        }

        if !review.blockers.is_empty() {
            out.push_str("\n## Blockers\n\n");
            for blocker in &review.blockers {
                out.push_str(&format!("- {}\n", blocker));
            }
        }

        if !review.summary.is_empty() {
            out.push_str(&format!("\n## Summary\n\n{}\n", review.summary));
        }

        Self {
            content: out,
            model_generated: false,
        }
    }
}

impl std::fmt::Display for DeliveryReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{RequirementCoverage, Task};

    #[test]
    fn test_blank_model_report_is_rejected() {
        assert!(DeliveryReport::from_model("  \n ").is_none());
        let report = DeliveryReport::from_model("# Done\n").unwrap();
        assert!(report.model_generated);
        assert_eq!(report.content, "# Done");
    }

    #[test]
    fn test_default_report_shape() {
        let mut plan = ProjectPlan::new("todo-api", "A todo API");
        plan.add_task(Task::new("1", "Scaffold"));
        plan.tasks[0].mark_completed();

        let mut review = ReviewResult::failed("transport down");
        review.requirements_coverage = vec![
            RequirementCoverage {
                requirement: "CRUD".to_string(),
                met: true,
                note: String::new(),
            },
            RequirementCoverage {
                requirement: "Auth".to_string(),
                met: false,
                note: "missing".to_string(),
            },
        ];

        let report = DeliveryReport::render_default(&plan, &review);
        let text = report.to_string();
        assert!(!report.model_generated);
        assert!(text.starts_with("# Delivery Report: todo-api"));
        assert!(text.contains("Approved: no"));
        assert!(text.contains("Completion: 0%"));
        assert!(text.contains("Quality score: 0/100"));
        assert!(text.contains("- [x] CRUD\n"));
        assert!(text.contains("- [ ] Auth (missing)"));
        assert!(text.contains("- [x] 1. Scaffold (completed)"));
        assert!(text.contains("Review failed: transport down"));
    }

    #[test]
    fn test_default_report_without_coverage() {
        let plan = ProjectPlan::new("x", "y");
        let report = DeliveryReport::render_default(&plan, &ReviewResult::failed("n/a"));
        assert!(report.content.contains("(no requirements assessed)"));
    }
}
