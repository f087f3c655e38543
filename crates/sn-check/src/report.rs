//! Status report: the first divergence of each category, for humans and
//! machines.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::assess::Assessment;
use crate::verify::Divergences;

const NO_ERRORS: &str = "No errors found";

/// Result of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStatus {
    /// Display name, e.g. "Condition 1"
    pub category: String,
    pub divergences: Divergences,
}

impl CategoryStatus {
    pub fn passed(&self) -> bool {
        self.divergences.is_empty()
    }

    /// The line shown for this category.
    pub fn summary(&self) -> &str {
        self.divergences.first().map_or(NO_ERRORS, String::as_str)
    }
}

/// Report over all categories of one assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Name of the checked bot
    pub label: String,
    pub student_id: u64,
    pub entries: Vec<CategoryStatus>,
}

impl StatusReport {
    /// Lay out an assessment in presentation order: each action directly
    /// after the condition that gates it.
    pub fn new(label: impl Into<String>, student_id: u64, assessment: &Assessment) -> Self {
        let condition = |i: usize| assessment.conditions.get(i).cloned().unwrap_or_default();
        let action = |i: usize| assessment.actions.get(i).cloned().unwrap_or_default();
        let integration = assessment.integration.first().cloned().unwrap_or_default();

        let entries = [
            ("Condition 1", condition(0)),
            ("Action 1", action(0)),
            ("Condition 2", condition(1)),
            ("Condition 3", condition(2)),
            ("Action 2", action(1)),
            ("Action 3", action(2)),
            ("Action 4", action(3)),
            ("Integration test", integration),
        ]
        .into_iter()
        .map(|(category, divergences)| CategoryStatus {
            category: category.to_string(),
            divergences,
        })
        .collect();

        Self {
            label: label.into(),
            student_id,
            entries,
        }
    }

    /// True if no category diverged.
    pub fn passed(&self) -> bool {
        self.entries.iter().all(CategoryStatus::passed)
    }

    /// Number of categories with divergences
    pub fn failed_categories(&self) -> usize {
        self.entries.iter().filter(|e| !e.passed()).count()
    }

    pub fn entry(&self, category: &str) -> Option<&CategoryStatus> {
        self.entries.iter().find(|e| e.category == category)
    }

    /// Print the report to stdout.
    pub fn print_summary(&self) {
        println!("{self}");
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Status report for {} (student {}).", self.label, self.student_id)?;
        for entry in &self.entries {
            if entry.category == "Integration test" {
                writeln!(f)?;
            }
            writeln!(f, "    {}: {}", entry.category, entry.summary())?;
        }
        Ok(())
    }
}
