//! Rule evaluators
//!
//! Each evaluator is a pure function over one tag's indexed rows and
//! returns the violations it finds. None of them fail: data they cannot
//! use is filtered out before they run.

pub mod custom_alerts;
pub mod hard_out;
pub mod max_hours;
pub mod meal_break;

use crate::config::TimeFormat;
use crate::index::DayMeta;
use shared_types::{RuleType, Severity, Tag, Violation};

pub use custom_alerts::{check_custom_duration, manual_reminder};
pub use hard_out::check_hard_out;
pub use max_hours::check_max_hours;
pub use meal_break::check_meal_break;

fn violation(
    tag: &Tag,
    severity: Severity,
    rule_type: RuleType,
    day_number: Option<u32>,
    row_id: Option<&str>,
    message: String,
) -> Violation {
    Violation {
        severity,
        tag_id: tag.id.clone(),
        tag_label: tag.label.clone(),
        day_number,
        row_id: row_id.map(str::to_string),
        message,
        rule_type,
    }
}

/// Wall-clock text for an offset into the day, or the raw offset when the
/// day's start time is unknown
fn clock_text(day: &DayMeta, offset_minutes: u64, format: TimeFormat) -> String {
    match day.clock(offset_minutes) {
        Some(time) => format.render(time),
        None => format!("+{}h{:02}m", offset_minutes / 60, offset_minutes % 60),
    }
}

/// Render hours without a trailing ".0" for whole numbers
fn hours_text(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{}", hours as i64)
    } else {
        format!("{}", hours)
    }
}
