use super::{hours_text, violation};
use crate::index::{group_by_day, IndexedRow};
use shared_types::{RuleType, Severity, Tag, Violation};

/// One warning per day on which the tag's scheduled total exceeds `max_hours`
pub fn check_max_hours(tag: &Tag, max_hours: f64, rows: &[IndexedRow]) -> Vec<Violation> {
    group_by_day(rows)
        .into_iter()
        .filter(|group| group.total_hours() > max_hours)
        .map(|group| {
            violation(
                tag,
                Severity::Warning,
                RuleType::MaxHours,
                Some(group.day.day_number),
                None,
                format!(
                    "{} is scheduled for {:.1} hours on Day {}, over the {} hour limit",
                    tag.label,
                    group.total_hours(),
                    group.day.day_number,
                    hours_text(max_hours)
                ),
            )
        })
        .collect()
}
