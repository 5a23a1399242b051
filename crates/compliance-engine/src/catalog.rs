//! Rule catalog
//!
//! Converts the loosely-typed [`Rules`] record attached to a tag into a
//! closed list of [`RuleKind`] values. Fields that are absent are simply
//! left out; fields that are present but unusable are reported as
//! [`SkippedRule`] so the caller can surface them without failing.

use crate::time::TimeOfDay;
use shared_types::{CustomAlert, Rules, RuleType};

/// Gap between consecutive rows, in minutes, above which a continuous
/// work block is considered broken by a meal
pub const MEAL_BLOCK_GAP_MINUTES: i64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    HardOut { limit: TimeOfDay },
    MaxHours { hours: f64 },
    MealBreak { hours: f64 },
    CustomDurationAlert { alert: CustomAlert, hours: f64 },
    ManualReminder { alert: CustomAlert },
}

impl RuleKind {
    pub fn rule_type(&self) -> RuleType {
        match self {
            RuleKind::HardOut { .. } => RuleType::HardOut,
            RuleKind::MaxHours { .. } => RuleType::MaxHours,
            RuleKind::MealBreak { .. } => RuleType::MealBreak,
            RuleKind::CustomDurationAlert { .. } => RuleType::CustomDurationAlert,
            RuleKind::ManualReminder { .. } => RuleType::ManualReminder,
        }
    }

    /// Whether the rule needs the tag's schedule rows at all
    pub fn reads_schedule(&self) -> bool {
        !matches!(self, RuleKind::ManualReminder { .. })
    }
}

/// A configured rule field that could not be turned into a [`RuleKind`]
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRule {
    pub field: String,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleCatalog {
    pub kinds: Vec<RuleKind>,
    pub skipped: Vec<SkippedRule>,
}

impl RuleCatalog {
    pub fn from_rules(rules: &Rules) -> Self {
        let mut catalog = Self::default();

        if let Some(text) = &rules.hard_out {
            match TimeOfDay::parse(text) {
                Ok(limit) => catalog.kinds.push(RuleKind::HardOut { limit }),
                Err(e) => catalog.skip("hardOut", text, e.to_string()),
            }
        }

        if let Some(hours) = rules.max_hours {
            match positive_hours(hours) {
                Ok(hours) => catalog.kinds.push(RuleKind::MaxHours { hours }),
                Err(reason) => catalog.skip("maxHours", &hours.to_string(), reason),
            }
        }

        if let Some(hours) = rules.meal_break {
            match positive_hours(hours) {
                Ok(hours) => catalog.kinds.push(RuleKind::MealBreak { hours }),
                Err(reason) => catalog.skip("mealBreak", &hours.to_string(), reason),
            }
        }

        for alert in &rules.custom_alerts {
            match alert.threshold_hours {
                None => catalog.kinds.push(RuleKind::ManualReminder {
                    alert: alert.clone(),
                }),
                Some(hours) => match positive_hours(hours) {
                    Ok(hours) => catalog.kinds.push(RuleKind::CustomDurationAlert {
                        alert: alert.clone(),
                        hours,
                    }),
                    Err(reason) => catalog.skip(
                        &format!("customAlerts[{}].thresholdHours", alert.id),
                        &hours.to_string(),
                        reason,
                    ),
                },
            }
        }

        catalog
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    fn skip(&mut self, field: &str, value: &str, reason: String) {
        self.skipped.push(SkippedRule {
            field: field.to_string(),
            value: value.to_string(),
            reason,
        });
    }
}

fn positive_hours(hours: f64) -> Result<f64, String> {
    if !hours.is_finite() {
        return Err("threshold is not a finite number".to_string());
    }
    if hours <= 0.0 {
        return Err("threshold must be greater than zero".to_string());
    }
    Ok(hours)
}
