use super::{clock_text, violation};
use crate::config::TimeFormat;
use crate::index::IndexedRow;
use crate::time::{TimeOfDay, MINUTES_PER_DAY};
use shared_types::{RuleType, Severity, Tag, Violation};

/// Flags every row that ends after the tag's hard out
///
/// End times are measured on a non-wrapping axis from the day's midnight,
/// so a row running past midnight still compares as late. A hard out that
/// is earlier than the schedule start is read as falling on the next day.
/// Ending exactly at the hard out is allowed.
pub fn check_hard_out(
    tag: &Tag,
    limit: TimeOfDay,
    rows: &[IndexedRow],
    format: TimeFormat,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for indexed in rows {
        // Unknown start time: nothing to compare against
        let Some(start) = indexed.day.start else {
            continue;
        };

        let start_minutes = start.minutes() as i64;
        let end = start_minutes + indexed.row.end_offset() as i64;
        let mut limit_minutes = limit.minutes() as i64;
        if limit_minutes < start_minutes {
            limit_minutes += MINUTES_PER_DAY;
        }

        if end > limit_minutes {
            let over = end - limit_minutes;
            violations.push(violation(
                tag,
                Severity::Critical,
                RuleType::HardOut,
                Some(indexed.day.day_number),
                Some(indexed.row.id.as_str()),
                format!(
                    "{} ends at {} on Day {}, past hard out of {} by {} min",
                    tag.label,
                    clock_text(&indexed.day, indexed.row.end_offset(), format),
                    indexed.day.day_number,
                    format.render(limit),
                    over
                ),
            ));
        }
    }

    violations
}
