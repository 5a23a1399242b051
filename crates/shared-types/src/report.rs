//! Compliance output contract

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 2,
            Severity::Warning => 1,
            Severity::Info => 0,
        }
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(name)
    }
}

/// Which rule produced a violation or reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleType {
    HardOut,
    MaxHours,
    MealBreak,
    CustomDurationAlert,
    ManualReminder,
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleType::HardOut => "hard out",
            RuleType::MaxHours => "max hours",
            RuleType::MealBreak => "meal break",
            RuleType::CustomDurationAlert => "custom alert",
            RuleType::ManualReminder => "reminder",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub severity: Severity,
    pub tag_id: String,
    pub tag_label: String,
    /// Absent for reminders, which are not tied to a day
    pub day_number: Option<u32>,
    pub row_id: Option<String>,
    pub message: String,
    pub rule_type: RuleType,
}

/// Manual alerts share the violation shape but never come from a threshold
pub type Reminder = Violation;

/// A rule or day that could not be evaluated because of bad input data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub tag_id: Option<String>,
    pub day_number: Option<u32>,
    pub field: String,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub violations: Vec<Violation>,
    pub reminders: Vec<Reminder>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
    pub critical_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub reminder_count: usize,
    /// Unix seconds at which the report was computed
    pub timestamp: u64,
}

impl ComplianceReport {
    pub fn new(
        violations: Vec<Violation>,
        reminders: Vec<Reminder>,
        diagnostics: Vec<Diagnostic>,
        timestamp: u64,
    ) -> Self {
        let count = |severity: Severity| {
            violations
                .iter()
                .filter(|v| v.severity == severity)
                .count()
        };

        Self {
            critical_count: count(Severity::Critical),
            warning_count: count(Severity::Warning),
            info_count: count(Severity::Info),
            reminder_count: reminders.len(),
            violations,
            reminders,
            diagnostics,
            timestamp,
        }
    }

    pub fn empty(timestamp: u64) -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), timestamp)
    }

    /// No violations and no reminders
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty() && self.reminders.is_empty()
    }

    pub fn total_issues(&self) -> usize {
        self.violations.len()
    }

    pub fn violations_for_tag<'a>(&'a self, tag_id: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.violations.iter().filter(move |v| v.tag_id == tag_id)
    }

    pub fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.severity == severity)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
