//! Custom alert anchor resolution
//!
//! A custom alert fires relative to a reference time on a schedule day:
//!
//! - **Tag mode** anchors on a named schedule point (`call`, `lunch`,
//!   `wrap`) or on the Nth row carrying the tag (`1st` to `5th`, `last`).
//! - **Event mode** anchors on one explicit row, referenced as
//!   `"<dayId>:<rowId>"`.
//!
//! The alert's offset is then applied with the sign implied by its kind.
//! When the reference cannot be found the result is
//! [`AnchorResolution::Unresolved`]; resolution never fails loudly.

use crate::index::{tag_occurrences, DayMeta};
use crate::time::TimeOfDay;
use serde::Serialize;
use shared_types::{AnchorMode, CustomAlert, Day, Schedule};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Highest ordinal occurrence an alert may anchor on
pub const MAX_ORDINAL: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Call,
    Lunch,
    Wrap,
    /// 1-based occurrence of the tag within the day
    Nth(usize),
    Last,
}

impl FromStr for Anchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(Anchor::Call),
            "lunch" => Ok(Anchor::Lunch),
            "wrap" => Ok(Anchor::Wrap),
            "1st" => Ok(Anchor::Nth(1)),
            "2nd" => Ok(Anchor::Nth(2)),
            "3rd" => Ok(Anchor::Nth(3)),
            "4th" => Ok(Anchor::Nth(4)),
            "5th" => Ok(Anchor::Nth(5)),
            "last" => Ok(Anchor::Last),
            other => Err(format!("unknown anchor {:?}", other)),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Call => f.write_str("call"),
            Anchor::Lunch => f.write_str("lunch"),
            Anchor::Wrap => f.write_str("wrap"),
            Anchor::Nth(1) => f.write_str("1st"),
            Anchor::Nth(2) => f.write_str("2nd"),
            Anchor::Nth(3) => f.write_str("3rd"),
            Anchor::Nth(n) => write!(f, "{}th", n),
            Anchor::Last => f.write_str("last"),
        }
    }
}

/// Reference to one schedule row by composite id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRef {
    pub day_id: String,
    pub row_id: String,
}

impl FromStr for EventRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((day_id, row_id)) if !day_id.is_empty() && !row_id.is_empty() => Ok(Self {
                day_id: day_id.to_string(),
                row_id: row_id.to_string(),
            }),
            _ => Err(format!("event reference {:?} is not \"dayId:rowId\"", s)),
        }
    }
}

/// Named anchor points of one day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulePoints {
    /// Start of the earliest row
    pub call: Option<TimeOfDay>,
    /// Start of the earliest meal-break row
    pub lunch: Option<TimeOfDay>,
    /// End of the latest-ending row
    pub wrap: Option<TimeOfDay>,
}

impl SchedulePoints {
    pub fn for_day(day: &Day) -> Self {
        let meta = DayMeta::of(day);

        let call = day.rows.iter().map(|row| row.offset_minutes).min();
        let lunch = day
            .rows
            .iter()
            .filter(|row| row.is_meal_break)
            .map(|row| row.offset_minutes)
            .min();
        let wrap = day.rows.iter().map(|row| row.end_offset()).max();

        Self {
            call: call.and_then(|offset| meta.clock(offset.into())),
            lunch: lunch.and_then(|offset| meta.clock(offset.into())),
            wrap: wrap.and_then(|offset| meta.clock(offset)),
        }
    }
}

/// Everything a tag-mode anchor can refer to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorContext {
    pub points: SchedulePoints,
    /// Start times of the tag's rows, earliest first
    pub occurrences: Vec<TimeOfDay>,
}

impl AnchorContext {
    pub fn for_day(day: &Day, tag_id: &str) -> Self {
        Self {
            points: SchedulePoints::for_day(day),
            occurrences: tag_occurrences(day, tag_id),
        }
    }

    pub fn time_of(&self, anchor: Anchor) -> Option<TimeOfDay> {
        match anchor {
            Anchor::Call => self.points.call,
            Anchor::Lunch => self.points.lunch,
            Anchor::Wrap => self.points.wrap,
            Anchor::Nth(n) if (1..=MAX_ORDINAL).contains(&n) => {
                self.occurrences.get(n - 1).copied()
            }
            Anchor::Nth(_) => None,
            Anchor::Last => self.occurrences.last().copied(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "camelCase")]
pub enum UnresolvedReason {
    /// The alert names no anchor for its mode
    MissingAnchor,
    UnknownAnchor(String),
    /// The named point or occurrence does not exist on the day
    AnchorNotFound(String),
    /// The referenced day or row no longer exists
    EventNotFound(String),
    /// The day a tag-mode alert is resolved on is not in the schedule
    DayNotFound(String),
    /// The day's schedule start time cannot be parsed
    InvalidStartTime(String),
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedReason::MissingAnchor => f.write_str("no anchor set"),
            UnresolvedReason::UnknownAnchor(s) => write!(f, "unknown anchor {}", s),
            UnresolvedReason::AnchorNotFound(s) => write!(f, "{} not on schedule", s),
            UnresolvedReason::EventNotFound(s) => write!(f, "event {} not found", s),
            UnresolvedReason::DayNotFound(s) => write!(f, "day {} not found", s),
            UnresolvedReason::InvalidStartTime(s) => write!(f, "bad start time {}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AnchorResolution {
    #[serde(rename_all = "camelCase")]
    Resolved {
        minutes: u16,
        resolved_time_text: String,
    },
    Unresolved { reason: UnresolvedReason },
}

impl AnchorResolution {
    fn resolved(time: TimeOfDay) -> Self {
        AnchorResolution::Resolved {
            minutes: time.minutes(),
            resolved_time_text: time.to_string(),
        }
    }

    fn unresolved(reason: UnresolvedReason) -> Self {
        debug!(%reason, "Alert anchor unresolved");
        AnchorResolution::Unresolved { reason }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, AnchorResolution::Resolved { .. })
    }

    pub fn time_text(&self) -> Option<&str> {
        match self {
            AnchorResolution::Resolved {
                resolved_time_text, ..
            } => Some(resolved_time_text),
            AnchorResolution::Unresolved { .. } => None,
        }
    }
}

/// Placeholder shown for unresolved anchors, never a made-up clock time
impl fmt::Display for AnchorResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorResolution::Resolved {
                resolved_time_text, ..
            } => f.write_str(resolved_time_text),
            AnchorResolution::Unresolved { .. } => f.write_str("--"),
        }
    }
}

/// Resolve an alert's trigger time
///
/// Tag-mode alerts look their anchor up in `context`; event-mode alerts
/// look the referenced row up in `schedule`.
pub fn resolve_anchor(
    alert: &CustomAlert,
    context: &AnchorContext,
    schedule: &Schedule,
) -> AnchorResolution {
    let base = match alert.anchor_mode {
        AnchorMode::Tag => tag_anchor_time(alert, context),
        AnchorMode::Event => event_anchor_time(alert, schedule),
    };

    match base {
        Ok(time) => AnchorResolution::resolved(time.offset(alert.signed_offset())),
        Err(reason) => AnchorResolution::unresolved(reason),
    }
}

/// Build the tag-mode context for `day_id` and resolve the alert against it
pub fn resolve_alert(
    alert: &CustomAlert,
    schedule: &Schedule,
    day_id: &str,
    tag_id: &str,
) -> AnchorResolution {
    let context = match schedule.day(day_id) {
        Some(day) => AnchorContext::for_day(day, tag_id),
        None if alert.anchor_mode == AnchorMode::Tag => {
            return AnchorResolution::unresolved(UnresolvedReason::DayNotFound(day_id.to_string()))
        }
        None => AnchorContext::default(),
    };

    resolve_anchor(alert, &context, schedule)
}

fn tag_anchor_time(
    alert: &CustomAlert,
    context: &AnchorContext,
) -> Result<TimeOfDay, UnresolvedReason> {
    let text = alert
        .anchor
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(UnresolvedReason::MissingAnchor)?;
    let anchor: Anchor = text
        .parse()
        .map_err(|_| UnresolvedReason::UnknownAnchor(text.to_string()))?;

    context
        .time_of(anchor)
        .ok_or_else(|| UnresolvedReason::AnchorNotFound(anchor.to_string()))
}

fn event_anchor_time(alert: &CustomAlert, schedule: &Schedule) -> Result<TimeOfDay, UnresolvedReason> {
    let text = alert
        .anchor_event
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(UnresolvedReason::MissingAnchor)?;
    let event: EventRef = text
        .parse()
        .map_err(|_| UnresolvedReason::UnknownAnchor(text.to_string()))?;

    let day = schedule
        .day(&event.day_id)
        .ok_or_else(|| UnresolvedReason::EventNotFound(text.to_string()))?;
    let row = day
        .row(&event.row_id)
        .ok_or_else(|| UnresolvedReason::EventNotFound(text.to_string()))?;

    DayMeta::of(day)
        .clock(row.offset_minutes.into())
        .ok_or_else(|| UnresolvedReason::InvalidStartTime(day.schedule_start_time.clone()))
}
