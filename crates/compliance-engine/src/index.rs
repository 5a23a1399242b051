//! Schedule index
//!
//! Flattens a multi-day [`Schedule`] into the rows carrying one tag, each
//! annotated with its owning day, and provides the grouping and ordering
//! the rule evaluators need.

use crate::time::{TimeOfDay, MINUTES_PER_DAY};
use shared_types::{Day, Schedule, ScheduleRow};
use std::collections::HashMap;

/// Metadata of the day a row belongs to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayMeta<'a> {
    pub day_id: &'a str,
    pub day_number: u32,
    pub date: &'a str,
    pub schedule_start_time: &'a str,
    /// Parsed start time, `None` when the day's start text is unparseable
    pub start: Option<TimeOfDay>,
}

impl<'a> DayMeta<'a> {
    pub fn of(day: &'a Day) -> Self {
        Self {
            day_id: &day.id,
            day_number: day.day_number,
            date: &day.date,
            schedule_start_time: &day.schedule_start_time,
            start: TimeOfDay::parse(&day.schedule_start_time).ok(),
        }
    }

    /// Wall-clock time `offset` minutes after the schedule start
    pub fn clock(&self, offset_minutes: u64) -> Option<TimeOfDay> {
        let within_day = (offset_minutes % MINUTES_PER_DAY as u64) as i64;
        self.start.map(|start| start.offset(within_day))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedRow<'a> {
    pub row: &'a ScheduleRow,
    pub day: DayMeta<'a>,
}

impl IndexedRow<'_> {
    pub fn offset(&self) -> u32 {
        self.row.offset_minutes
    }

    pub fn duration(&self) -> u32 {
        self.row.duration_minutes
    }
}

/// All tagged rows of one day
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup<'a> {
    pub day: DayMeta<'a>,
    pub rows: Vec<IndexedRow<'a>>,
    pub total_duration_minutes: u64,
}

impl DayGroup<'_> {
    pub fn total_hours(&self) -> f64 {
        self.total_duration_minutes as f64 / 60.0
    }
}

/// Every row in the schedule whose tag set contains `tag_id`, in schedule order
pub fn rows_tagged_with<'a>(schedule: &'a Schedule, tag_id: &str) -> Vec<IndexedRow<'a>> {
    let mut rows = Vec::new();

    for day in &schedule.days {
        let meta = DayMeta::of(day);
        rows.extend(
            day.rows
                .iter()
                .filter(|row| row.has_tag(tag_id))
                .map(|row| IndexedRow { row, day: meta }),
        );
    }

    rows
}

/// Group rows by owning day, keeping days in order of first appearance
pub fn group_by_day<'a>(rows: &[IndexedRow<'a>]) -> Vec<DayGroup<'a>> {
    let mut groups: Vec<DayGroup<'a>> = Vec::new();
    let mut positions: HashMap<&'a str, usize> = HashMap::new();

    for indexed in rows {
        let pos = *positions.entry(indexed.day.day_id).or_insert_with(|| {
            groups.push(DayGroup {
                day: indexed.day,
                rows: Vec::new(),
                total_duration_minutes: 0,
            });
            groups.len() - 1
        });

        let group = &mut groups[pos];
        group.rows.push(*indexed);
        group.total_duration_minutes += u64::from(indexed.duration());
    }

    groups
}

/// Rows ordered by offset; equal offsets keep their original order
pub fn sorted_by_offset<'a>(rows: &[IndexedRow<'a>]) -> Vec<IndexedRow<'a>> {
    let mut sorted = rows.to_vec();
    sorted.sort_by_key(|indexed| indexed.offset());
    sorted
}

/// Start times of the day's rows carrying `tag_id`, earliest first
pub fn tag_occurrences(day: &Day, tag_id: &str) -> Vec<TimeOfDay> {
    let meta = DayMeta::of(day);
    let mut rows: Vec<&ScheduleRow> = day.rows.iter().filter(|row| row.has_tag(tag_id)).collect();
    rows.sort_by_key(|row| row.offset_minutes);

    rows.into_iter()
        .filter_map(|row| meta.clock(row.offset_minutes.into()))
        .collect()
}
