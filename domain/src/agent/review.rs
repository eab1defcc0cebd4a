//! Review verdicts.
//!
//! A [`ReviewResult`] is produced once per review attempt and never mutated
//! afterwards. Reviews never fail: transport and parse problems degrade to
//! [`ReviewResult::failed`], an unapproved verdict with one blocker.

use crate::parsing::fields::{bool_field, percent_field, string_field, string_list};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether one stated requirement is covered by the delivered files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementCoverage {
    pub requirement: String,
    pub met: bool,
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeQuality {
    /// 0-100
    pub score: u8,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResult {
    pub approved: bool,
    /// 0-100
    pub completion_percentage: u8,
    pub requirements_coverage: Vec<RequirementCoverage>,
    pub code_quality: CodeQuality,
    pub missing_items: Vec<String>,
    pub blockers: Vec<String>,
    pub summary: String,
}

impl ReviewResult {
    /// Degraded verdict for a review that could not be obtained.
    pub fn failed(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            approved: false,
            completion_percentage: 0,
            requirements_coverage: Vec::new(),
            code_quality: CodeQuality::default(),
            missing_items: Vec::new(),
            blockers: vec![format!("Review failed: {}", reason)],
            summary: format!("The project could not be reviewed ({}).", reason),
        }
    }

    /// Parse a reviewer JSON object. `approved` is required.
    ///
    /// `requirementsCoverage` is accepted either as a list of
    /// `{"requirement", "met", "note"}` entries or as an object mapping each
    /// requirement to a boolean or to `{"met", "note"}`.
    pub fn from_json(json: &Value) -> Option<Self> {
        let approved = bool_field(json, "approved")?;
        let quality = json.get("codeQuality").cloned().unwrap_or(Value::Null);

        Some(Self {
            approved,
            completion_percentage: percent_field(json, "completionPercentage").unwrap_or(0),
            requirements_coverage: parse_coverage(json.get("requirementsCoverage")),
            code_quality: CodeQuality {
                score: percent_field(&quality, "score").unwrap_or(0),
                strengths: string_list(&quality, "strengths"),
                weaknesses: string_list(&quality, "weaknesses"),
            },
            missing_items: string_list(json, "missingItems"),
            blockers: string_list(json, "blockers"),
            summary: string_field(json, "summary"),
        })
    }

    /// Items a rework round should address: missing items, then blockers.
    pub fn rework_items(&self) -> Vec<String> {
        self.missing_items
            .iter()
            .chain(&self.blockers)
            .cloned()
            .collect()
    }

    /// One-line verdict recorded in project memory.
    pub fn verdict_line(&self) -> String {
        format!(
            "Review {}: {}% complete, quality {}/100",
            if self.approved { "approved" } else { "rejected" },
            self.completion_percentage,
            self.code_quality.score
        )
    }
}

fn parse_coverage(value: Option<&Value>) -> Vec<RequirementCoverage> {
    match value {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| {
                let requirement = string_field(entry, "requirement");
                if requirement.is_empty() {
                    return None;
                }
                Some(RequirementCoverage {
                    requirement,
                    met: bool_field(entry, "met").unwrap_or(false),
                    note: string_field(entry, "note"),
                })
            })
            .collect(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(requirement, entry)| {
                let (met, note) = match entry {
                    Value::Bool(met) => (*met, String::new()),
                    other => (
                        bool_field(other, "met").unwrap_or(false),
                        string_field(other, "note"),
                    ),
                };
                RequirementCoverage {
                    requirement: requirement.clone(),
                    met,
                    note,
                }
            })
            .collect(),
        _ => Vec::new(),
    }
}
