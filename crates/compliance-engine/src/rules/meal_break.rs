use super::{clock_text, hours_text, violation};
use crate::catalog::MEAL_BLOCK_GAP_MINUTES;
use crate::config::TimeFormat;
use crate::index::{group_by_day, sorted_by_offset, DayMeta, IndexedRow};
use shared_types::{RuleType, Severity, Tag, Violation};

/// A run of rows with no gap longer than [`MEAL_BLOCK_GAP_MINUTES`]
struct Block<'r> {
    first: &'r IndexedRow<'r>,
    continuous_minutes: u64,
}

/// Flags each continuous work block longer than `meal_break` hours
///
/// Rows are walked in offset order per day. A gap of more than 30 minutes
/// between the end of one row and the start of the next closes the
/// current block; shorter gaps and overlaps extend it by the full duration
/// of the next row.
pub fn check_meal_break(
    tag: &Tag,
    meal_break: f64,
    rows: &[IndexedRow],
    format: TimeFormat,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for group in group_by_day(rows) {
        let sorted = sorted_by_offset(&group.rows);
        let Some((head, rest)) = sorted.split_first() else {
            continue;
        };

        let mut block = Block {
            first: head,
            continuous_minutes: head.duration().into(),
        };
        let mut previous = head;

        for current in rest {
            let gap = current.offset() as i64 - previous.row.end_offset() as i64;

            if gap > MEAL_BLOCK_GAP_MINUTES {
                violations.extend(close_block(tag, &group.day, &block, meal_break, format));
                block = Block {
                    first: current,
                    continuous_minutes: current.duration().into(),
                };
            } else {
                block.continuous_minutes += u64::from(current.duration());
            }

            previous = current;
        }

        violations.extend(close_block(tag, &group.day, &block, meal_break, format));
    }

    violations
}

fn close_block(
    tag: &Tag,
    day: &DayMeta,
    block: &Block,
    meal_break: f64,
    format: TimeFormat,
) -> Option<Violation> {
    let hours = block.continuous_minutes as f64 / 60.0;
    if hours <= meal_break {
        return None;
    }

    Some(violation(
        tag,
        Severity::Warning,
        RuleType::MealBreak,
        Some(day.day_number),
        Some(block.first.row.id.as_str()),
        format!(
            "{} works {:.1} continuous hours from {} on Day {} without a meal break (limit {} hours)",
            tag.label,
            hours,
            clock_text(day, block.first.offset().into(), format),
            day.day_number,
            hours_text(meal_break)
        ),
    ))
}
