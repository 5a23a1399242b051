//! Schedule and tag input contract
//!
//! These mirror the JSON handed over by the schedule editor and the tag
//! manager. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A reusable cast/crew/equipment marker that schedule rows reference by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Rules>,
}

impl Tag {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color_hint: None,
            rules: None,
        }
    }

    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color_hint = Some(color.into());
        self
    }

    /// True when the tag carries at least one configured rule field
    pub fn has_rules(&self) -> bool {
        self.rules.as_ref().is_some_and(|rules| !rules.is_empty())
    }
}

/// Work rules attached to a tag. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rules {
    /// Latest permissible end-of-work time, e.g. "7:00 PM" or "19:00"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard_out: Option<String>,
    /// Maximum scheduled hours per day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hours: Option<f64>,
    /// Maximum continuous hours before a meal break is required
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_break: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_alerts: Vec<CustomAlert>,
}

impl Rules {
    pub fn is_empty(&self) -> bool {
        self.hard_out.is_none()
            && self.max_hours.is_none()
            && self.meal_break.is_none()
            && self.custom_alerts.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Before,
    After,
    Every,
    At,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlertKind::Before => "before",
            AlertKind::After => "after",
            AlertKind::Every => "every",
            AlertKind::At => "at",
        };
        f.write_str(name)
    }
}

/// Where a custom alert takes its reference time from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorMode {
    /// A named schedule point (call/lunch/wrap) or an ordinal tag occurrence
    #[default]
    Tag,
    /// One explicit schedule row, referenced as "dayId:rowId"
    Event,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomAlert {
    pub id: String,
    pub description: String,
    pub kind: AlertKind,
    #[serde(default)]
    pub anchor_mode: AnchorMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_event: Option<String>,
    #[serde(default)]
    pub offset_minutes: i64,
    /// Per-day hour threshold. Alerts without one are plain reminders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_hours: Option<f64>,
}

impl CustomAlert {
    pub fn new(id: impl Into<String>, description: impl Into<String>, kind: AlertKind) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            kind,
            anchor_mode: AnchorMode::Tag,
            anchor: None,
            anchor_event: None,
            offset_minutes: 0,
            threshold_hours: None,
        }
    }

    /// Anchor on a schedule point or tag occurrence ("wrap", "2nd", ...)
    pub fn anchored_to(mut self, anchor: impl Into<String>) -> Self {
        self.anchor_mode = AnchorMode::Tag;
        self.anchor = Some(anchor.into());
        self
    }

    /// Anchor on one explicit schedule row
    pub fn anchored_to_event(mut self, day_id: &str, row_id: &str) -> Self {
        self.anchor_mode = AnchorMode::Event;
        self.anchor_event = Some(format!("{}:{}", day_id, row_id));
        self
    }

    pub fn with_offset(mut self, hours: i64, minutes: i64) -> Self {
        self.offset_minutes = Self::offset_from_parts(hours, minutes);
        self
    }

    pub fn with_threshold(mut self, hours: f64) -> Self {
        self.threshold_hours = Some(hours);
        self
    }

    /// The editor collects hours and minutes separately
    pub fn offset_from_parts(hours: i64, minutes: i64) -> i64 {
        hours.saturating_mul(60).saturating_add(minutes)
    }

    /// Offset with the sign implied by the alert kind
    pub fn signed_offset(&self) -> i64 {
        let magnitude = self.offset_minutes.saturating_abs();
        match self.kind {
            AlertKind::Before => -magnitude,
            AlertKind::After | AlertKind::Every | AlertKind::At => magnitude,
        }
    }

    /// Human description of when the alert fires, e.g. "30m before wrap"
    pub fn timing(&self) -> String {
        let target = match self.anchor_mode {
            AnchorMode::Tag => self.anchor.clone().unwrap_or_else(|| "?".to_string()),
            AnchorMode::Event => match &self.anchor_event {
                Some(event) => format!("event {}", event),
                None => "event ?".to_string(),
            },
        };

        let magnitude = self.offset_minutes.unsigned_abs();
        if magnitude == 0 {
            return format!("at {}", target);
        }

        let (hours, minutes) = (magnitude / 60, magnitude % 60);
        let amount = match (hours, minutes) {
            (0, m) => format!("{}m", m),
            (h, 0) => format!("{}h", h),
            (h, m) => format!("{}h {}m", h, m),
        };
        format!("{} {} {}", amount, self.kind, target)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    pub id: String,
    /// Minutes after the day's schedule start
    pub offset_minutes: u32,
    pub duration_minutes: u32,
    #[serde(default)]
    pub tag_ids: BTreeSet<String>,
    #[serde(default)]
    pub is_meal_break: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ScheduleRow {
    pub fn new(id: impl Into<String>, offset_minutes: u32, duration_minutes: u32) -> Self {
        Self {
            id: id.into(),
            offset_minutes,
            duration_minutes,
            tag_ids: BTreeSet::new(),
            is_meal_break: false,
            label: None,
        }
    }

    pub fn tagged(mut self, tag_id: impl Into<String>) -> Self {
        self.tag_ids.insert(tag_id.into());
        self
    }

    pub fn meal_break(mut self) -> Self {
        self.is_meal_break = true;
        self
    }

    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tag_ids.contains(tag_id)
    }

    /// Minutes after schedule start at which the row ends
    pub fn end_offset(&self) -> u64 {
        u64::from(self.offset_minutes) + u64::from(self.duration_minutes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub id: String,
    pub day_number: u32,
    #[serde(default)]
    pub date: String,
    /// Wall-clock start of the day's schedule, e.g. "7:00 AM"
    pub schedule_start_time: String,
    #[serde(default)]
    pub rows: Vec<ScheduleRow>,
}

impl Day {
    pub fn new(
        id: impl Into<String>,
        day_number: u32,
        schedule_start_time: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            day_number,
            date: String::new(),
            schedule_start_time: schedule_start_time.into(),
            rows: Vec::new(),
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn with_row(mut self, row: ScheduleRow) -> Self {
        self.rows.push(row);
        self
    }

    pub fn row(&self, row_id: &str) -> Option<&ScheduleRow> {
        self.rows.iter().find(|row| row.id == row_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub days: Vec<Day>,
}

impl Schedule {
    pub fn new(days: Vec<Day>) -> Self {
        Self { days }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn day(&self, day_id: &str) -> Option<&Day> {
        self.days.iter().find(|day| day.id == day_id)
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(|day| day.rows.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_schedule_from_camel_case_json() {
        let json = r#"{
            "days": [{
                "id": "d1",
                "dayNumber": 1,
                "date": "2024-03-04",
                "scheduleStartTime": "7:00 AM",
                "rows": [
                    {"id": "r1", "offsetMinutes": 0, "durationMinutes": 90, "tagIds": ["lead"]},
                    {"id": "r2", "offsetMinutes": 90, "durationMinutes": 60, "isMealBreak": true}
                ]
            }]
        }"#;

        let schedule = Schedule::from_json(json).unwrap();
        let day = schedule.day("d1").unwrap();
        assert_eq!(day.day_number, 1);
        assert_eq!(day.schedule_start_time, "7:00 AM");
        assert!(day.rows[0].has_tag("lead"));
        assert!(day.rows[1].is_meal_break);
        assert!(day.rows[1].tag_ids.is_empty());
        assert_eq!(day.rows[1].end_offset(), 150);
    }

    #[test]
    fn test_negative_offsets_are_rejected() {
        let json = r#"{"days": [{"id": "d1", "dayNumber": 1, "scheduleStartTime": "7:00",
            "rows": [{"id": "r1", "offsetMinutes": -5, "durationMinutes": 10}]}]}"#;
        assert!(Schedule::from_json(json).is_err());
    }

    #[test]
    fn test_tag_without_rules_is_not_evaluated() {
        let tag = Tag::new("t1", "Lead");
        assert!(!tag.has_rules());

        let tag = tag.with_rules(Rules::default());
        assert!(!tag.has_rules());

        let tag = Tag::new("t2", "Child").with_rules(Rules {
            max_hours: Some(8.0),
            ..Default::default()
        });
        assert!(tag.has_rules());
    }

    #[test]
    fn test_alert_signed_offset_follows_kind() {
        let before = CustomAlert::new("a1", "Wardrobe", AlertKind::Before).with_offset(0, 30);
        assert_eq!(before.signed_offset(), -30);

        let after = CustomAlert::new("a2", "Check-in", AlertKind::After).with_offset(1, 15);
        assert_eq!(after.offset_minutes, 75);
        assert_eq!(after.signed_offset(), 75);
    }

    #[test]
    fn test_alert_timing_description() {
        let alert = CustomAlert::new("a1", "Wardrobe", AlertKind::Before)
            .anchored_to("wrap")
            .with_offset(0, 30);
        assert_eq!(alert.timing(), "30m before wrap");

        let alert = CustomAlert::new("a2", "Turnaround", AlertKind::After)
            .anchored_to("2nd")
            .with_offset(1, 15);
        assert_eq!(alert.timing(), "1h 15m after 2nd");

        let alert = CustomAlert::new("a3", "Stunt", AlertKind::At).anchored_to_event("d1", "r3");
        assert_eq!(alert.timing(), "at event d1:r3");
    }

    #[test]
    fn test_extreme_offsets_saturate() {
        assert_eq!(CustomAlert::offset_from_parts(i64::MAX, 59), i64::MAX);
        assert_eq!(CustomAlert::offset_from_parts(i64::MIN / 2, -1), i64::MIN);

        let mut before = CustomAlert::new("a1", "Pickup", AlertKind::Before).anchored_to("wrap");
        before.offset_minutes = i64::MIN;
        assert_eq!(before.signed_offset(), -i64::MAX);
        assert!(before.timing().ends_with("before wrap"));

        let mut after = CustomAlert::new("a2", "Pickup", AlertKind::After);
        after.offset_minutes = i64::MIN;
        assert_eq!(after.signed_offset(), i64::MAX);

        let row = ScheduleRow::new("r1", u32::MAX, u32::MAX);
        assert_eq!(row.end_offset(), 2 * u32::MAX as u64);
    }

    #[test]
    fn test_builders_fill_optional_fields() {
        let tag = Tag::new("cam", "Camera A").with_color("#ff8800");
        let json = serde_json::to_value(&tag).unwrap();
        assert_eq!(json["colorHint"], "#ff8800");
        assert!(json.get("rules").is_none());

        let day = Day::new("d1", 1, "7:00 AM").with_date("2024-03-04");
        assert_eq!(day.date, "2024-03-04");

        let schedule = Schedule::new(vec![day.clone()]);
        assert!(schedule.is_empty());
        let schedule = Schedule::new(vec![day.with_row(ScheduleRow::new("r1", 0, 30))]);
        assert!(!schedule.is_empty());
        assert!(Schedule::default().is_empty());
    }

    #[test]
    fn test_alert_kind_wire_names() {
        let alert: CustomAlert = serde_json::from_str(
            r#"{"id": "a1", "description": "Pickup", "kind": "before",
                "anchorMode": "event", "anchorEvent": "d1:r2", "offsetMinutes": 45}"#,
        )
        .unwrap();
        assert_eq!(alert.kind, AlertKind::Before);
        assert_eq!(alert.anchor_mode, AnchorMode::Event);
        assert_eq!(alert.anchor_event.as_deref(), Some("d1:r2"));
        assert_eq!(alert.threshold_hours, None);
    }
}
