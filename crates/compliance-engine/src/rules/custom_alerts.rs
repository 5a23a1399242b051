use super::{hours_text, violation};
use crate::index::{group_by_day, IndexedRow};
use shared_types::{CustomAlert, Reminder, RuleType, Severity, Tag, Violation};

/// Same per-day aggregation as max hours, keyed to a user-defined alert
pub fn check_custom_duration(
    tag: &Tag,
    alert: &CustomAlert,
    threshold_hours: f64,
    rows: &[IndexedRow],
) -> Vec<Violation> {
    group_by_day(rows)
        .into_iter()
        .filter(|group| group.total_hours() > threshold_hours)
        .map(|group| {
            violation(
                tag,
                Severity::Info,
                RuleType::CustomDurationAlert,
                Some(group.day.day_number),
                None,
                format!(
                    "{}: {} has {:.1} hours on Day {} (alert at {} hours)",
                    alert.description,
                    tag.label,
                    group.total_hours(),
                    group.day.day_number,
                    hours_text(threshold_hours)
                ),
            )
        })
        .collect()
}

/// Reminders do not look at the schedule; one is raised per alert per tag
pub fn manual_reminder(tag: &Tag, alert: &CustomAlert) -> Reminder {
    violation(
        tag,
        Severity::Info,
        RuleType::ManualReminder,
        None,
        None,
        format!("{} ({}) for {}", alert.description, alert.timing(), tag.label),
    )
}
