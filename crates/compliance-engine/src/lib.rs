//! # compliance-engine
//!
//! Checks a multi-day production schedule against the work rules carried
//! by its tags (cast, crew, equipment) and resolves the trigger times of
//! custom alerts.
//!
//! ## Modules
//!
//! - [`time`] - time-of-day parsing, formatting and wraparound arithmetic
//! - [`catalog`] - typed rule kinds built from a tag's rule record
//! - [`index`] - rows carrying a tag, grouped by day and ordered by offset
//! - [`rules`] - one evaluator per rule kind
//! - [`anchor`] - custom alert anchor resolution
//! - [`repository`] - tag storage seam
//! - [`config`] - presentation settings
//!
//! Validation is best effort: unusable rule values or day start times skip
//! the affected rule and are listed as diagnostics. A report is always
//! produced.

pub mod anchor;
pub mod catalog;
pub mod config;
pub mod error;
pub mod index;
pub mod repository;
pub mod rules;
pub mod time;

pub use anchor::{resolve_alert, resolve_anchor, AnchorContext, AnchorResolution, SchedulePoints};
pub use catalog::{RuleCatalog, RuleKind, MEAL_BLOCK_GAP_MINUTES};
pub use config::{EngineConfig, TimeFormat};
pub use error::{RepositoryError, TimeParseError};
pub use repository::{InMemoryTagRepository, TagRepository};
pub use time::{format_time_of_day, offset_time_of_day, parse_time_of_day, TimeOfDay, TimeStyle};

use index::{rows_tagged_with, IndexedRow};
use shared_types::{ComplianceReport, Diagnostic, Reminder, Schedule, Tag, Violation};
use std::collections::HashSet;
use tracing::{debug, warn};

/// ComplianceEngine entry point
#[derive(Debug, Clone, Default)]
pub struct ComplianceEngine {
    config: EngineConfig,
}

#[derive(Debug, Default)]
struct TagOutcome {
    violations: Vec<Violation>,
    reminders: Vec<Reminder>,
    diagnostics: Vec<Diagnostic>,
}

impl ComplianceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate every tag in the repository against the schedule
    pub fn validate_schedule<R: TagRepository + ?Sized>(
        &self,
        tags: &R,
        schedule: &Schedule,
    ) -> ComplianceReport {
        self.validate_at(tags, schedule, now())
    }

    /// Same as [`validate_schedule`](Self::validate_schedule) with a fixed report timestamp
    pub fn validate_at<R: TagRepository + ?Sized>(
        &self,
        tags: &R,
        schedule: &Schedule,
        timestamp: u64,
    ) -> ComplianceReport {
        self.evaluate(tags.list().iter(), schedule, timestamp)
    }

    pub fn validate_tags(&self, tags: &[Tag], schedule: &Schedule) -> ComplianceReport {
        self.evaluate(tags.iter(), schedule, now())
    }

    /// Violations for a single tag, without reminders
    pub fn check_tag(&self, tag: &Tag, schedule: &Schedule) -> Vec<Violation> {
        self.evaluate_tag(tag, schedule).violations
    }

    fn evaluate<'t>(
        &self,
        tags: impl Iterator<Item = &'t Tag>,
        schedule: &Schedule,
        timestamp: u64,
    ) -> ComplianceReport {
        let mut violations = Vec::new();
        let mut reminders = Vec::new();
        let mut diagnostics = Vec::new();

        for tag in tags.filter(|tag| tag.has_rules()) {
            let outcome = self.evaluate_tag(tag, schedule);
            violations.extend(outcome.violations);
            reminders.extend(outcome.reminders);
            diagnostics.extend(outcome.diagnostics);
        }

        if !self.config.include_reminders {
            reminders.clear();
        }
        if !self.config.diagnostics {
            diagnostics.clear();
        }

        let report = ComplianceReport::new(violations, reminders, diagnostics, timestamp);
        debug!(
            critical = report.critical_count,
            warning = report.warning_count,
            info = report.info_count,
            reminders = report.reminder_count,
            diagnostics = report.diagnostics.len(),
            "Schedule validated"
        );
        report
    }

    fn evaluate_tag(&self, tag: &Tag, schedule: &Schedule) -> TagOutcome {
        let mut outcome = TagOutcome::default();
        let Some(tag_rules) = &tag.rules else {
            return outcome;
        };

        let catalog = RuleCatalog::from_rules(tag_rules);
        for skipped in &catalog.skipped {
            warn!(tag = %tag.id, field = %skipped.field, reason = %skipped.reason, "Rule skipped");
            outcome.diagnostics.push(Diagnostic {
                tag_id: Some(tag.id.clone()),
                day_number: None,
                field: skipped.field.clone(),
                value: skipped.value.clone(),
                reason: skipped.reason.clone(),
            });
        }

        // Reminders alone never need the schedule
        let rows = if catalog.kinds.iter().any(RuleKind::reads_schedule) {
            rows_tagged_with(schedule, &tag.id)
        } else {
            Vec::new()
        };
        debug!(tag = %tag.id, rows = rows.len(), rules = catalog.kinds.len(), "Evaluating tag");

        let format = self.config.time_format;
        for kind in &catalog.kinds {
            match kind {
                RuleKind::HardOut { limit } => {
                    outcome.diagnostics.extend(start_time_diagnostics(tag, &rows));
                    outcome
                        .violations
                        .extend(rules::check_hard_out(tag, *limit, &rows, format));
                }
                RuleKind::MaxHours { hours } => {
                    outcome
                        .violations
                        .extend(rules::check_max_hours(tag, *hours, &rows));
                }
                RuleKind::MealBreak { hours } => {
                    outcome
                        .violations
                        .extend(rules::check_meal_break(tag, *hours, &rows, format));
                }
                RuleKind::CustomDurationAlert { alert, hours } => {
                    outcome
                        .violations
                        .extend(rules::check_custom_duration(tag, alert, *hours, &rows));
                }
                RuleKind::ManualReminder { alert } => {
                    if self.config.include_reminders {
                        outcome.reminders.push(rules::manual_reminder(tag, alert));
                    }
                }
            }
        }

        outcome
    }
}

/// Validate with the default configuration
pub fn validate_schedule<R: TagRepository + ?Sized>(
    tags: &R,
    schedule: &Schedule,
) -> ComplianceReport {
    ComplianceEngine::new().validate_schedule(tags, schedule)
}

/// One diagnostic per day whose start time blocks the hard-out check
fn start_time_diagnostics(tag: &Tag, rows: &[IndexedRow]) -> Vec<Diagnostic> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|indexed| indexed.day.start.is_none())
        .filter(|indexed| seen.insert(indexed.day.day_id))
        .map(|indexed| {
            warn!(tag = %tag.id, day = indexed.day.day_number, "Hard out skipped for day");
            Diagnostic {
                tag_id: Some(tag.id.clone()),
                day_number: Some(indexed.day.day_number),
                field: "scheduleStartTime".to_string(),
                value: indexed.day.schedule_start_time.to_string(),
                reason: "schedule start time is unparseable; hard out not checked".to_string(),
            }
        })
        .collect()
}

fn now() -> u64 {
    chrono::Utc::now().timestamp() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{AlertKind, CustomAlert, Day, Rules, RuleType, ScheduleRow, Severity};

    fn lead(rules: Rules) -> Tag {
        Tag::new("lead", "Lead Actor").with_rules(rules)
    }

    fn one_day(start: &str, rows: Vec<ScheduleRow>) -> Schedule {
        let mut day = Day::new("d1", 1, start);
        day.rows = rows;
        Schedule::new(vec![day])
    }

    #[test]
    fn test_empty_schedule_gives_empty_report() {
        let engine = ComplianceEngine::new();
        let tags = vec![lead(Rules {
            hard_out: Some("17:00".to_string()),
            max_hours: Some(8.0),
            meal_break: Some(6.0),
            ..Default::default()
        })];

        let report = engine.validate_tags(&tags, &Schedule::default());
        assert!(report.is_clean());
        assert_eq!(report.critical_count, 0);
        assert_eq!(report.warning_count, 0);
        assert_eq!(report.info_count, 0);
        assert_eq!(report.reminder_count, 0);
    }

    #[test]
    fn test_tags_without_rules_are_ignored() {
        let engine = ComplianceEngine::new();
        let schedule = one_day("06:00", vec![ScheduleRow::new("r1", 0, 1200).tagged("extra")]);
        let tags = vec![Tag::new("extra", "Extras"), Tag::new("lead", "Lead Actor")];

        let report = engine.validate_tags(&tags, &schedule);
        assert!(report.is_clean());
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_engine_combines_rule_kinds() {
        let engine = ComplianceEngine::new();
        let tag = lead(Rules {
            hard_out: Some("17:00".to_string()),
            max_hours: Some(8.0),
            meal_break: Some(6.0),
            custom_alerts: vec![
                CustomAlert::new("a1", "Pickup", AlertKind::Before)
                    .anchored_to("call")
                    .with_offset(0, 45),
            ],
        });
        // 08:00 to 18:00 with no break
        let schedule = one_day(
            "08:00",
            vec![
                ScheduleRow::new("r1", 0, 300).tagged("lead"),
                ScheduleRow::new("r2", 300, 300).tagged("lead"),
            ],
        );

        let report = engine.validate_tags(&[tag], &schedule);

        assert_eq!(report.critical_count, 1);
        assert_eq!(report.warning_count, 2);
        assert_eq!(report.reminder_count, 1);
        let kinds: Vec<_> = report.violations.iter().map(|v| v.rule_type).collect();
        assert_eq!(
            kinds,
            vec![RuleType::HardOut, RuleType::MaxHours, RuleType::MealBreak]
        );
        assert_eq!(report.reminders[0].rule_type, RuleType::ManualReminder);
    }

    #[test]
    fn test_bad_values_become_diagnostics() {
        let engine = ComplianceEngine::new();
        let tag = lead(Rules {
            hard_out: Some("quitting time".to_string()),
            max_hours: Some(4.0),
            ..Default::default()
        });
        let schedule = one_day("08:00", vec![ScheduleRow::new("r1", 0, 600).tagged("lead")]);

        let report = engine.validate_tags(&[tag], &schedule);

        assert_eq!(report.critical_count, 0);
        assert_eq!(report.warning_count, 1);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].field, "hardOut");
        assert_eq!(report.diagnostics[0].value, "quitting time");
    }

    #[test]
    fn test_unparseable_day_start_reported_once_per_day() {
        let engine = ComplianceEngine::new();
        let tag = lead(Rules {
            hard_out: Some("17:00".to_string()),
            ..Default::default()
        });
        let schedule = one_day(
            "sometime",
            vec![
                ScheduleRow::new("r1", 0, 600).tagged("lead"),
                ScheduleRow::new("r2", 600, 600).tagged("lead"),
            ],
        );

        let report = engine.validate_tags(&[tag], &schedule);
        assert!(report.violations.is_empty());
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].day_number, Some(1));
    }

    #[test]
    fn test_config_can_drop_reminders_and_diagnostics() {
        let engine = ComplianceEngine::with_config(EngineConfig {
            include_reminders: false,
            diagnostics: false,
            ..Default::default()
        });
        let tag = lead(Rules {
            max_hours: Some(-3.0),
            custom_alerts: vec![CustomAlert::new("a1", "Call home", AlertKind::At)],
            ..Default::default()
        });

        let report = engine.validate_tags(&[tag], &Schedule::default());
        assert_eq!(report.reminder_count, 0);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_twenty_four_hour_messages() {
        let engine = ComplianceEngine::with_config(EngineConfig {
            time_format: TimeFormat::TwentyFourHour,
            ..Default::default()
        });
        let tag = lead(Rules {
            hard_out: Some("7:00 PM".to_string()),
            ..Default::default()
        });
        let schedule = one_day("9:00 AM", vec![ScheduleRow::new("r1", 0, 660).tagged("lead")]);

        let violations = engine.check_tag(&tag, &schedule);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Critical);
        assert!(violations[0].message.contains("20:00"), "{}", violations[0].message);
        assert!(violations[0].message.contains("19:00"), "{}", violations[0].message);
    }

    #[test]
    fn test_validate_at_uses_given_timestamp() {
        let repo = InMemoryTagRepository::new();
        let report = ComplianceEngine::new().validate_at(&repo, &Schedule::default(), 1234);
        assert_eq!(report.timestamp, 1234);
    }
}
