//! Wall-clock time-of-day arithmetic
//!
//! Schedules store times as display text in either 12-hour ("7:30 AM") or
//! 24-hour ("19:30") notation. [`TimeOfDay`] holds minutes since midnight
//! together with the notation it was written in, so arithmetic results can
//! be shown back to the user the way they typed them.
//!
//! All operations are same-day: hours wrap modulo 24 and no calendar date
//! is tracked.

use crate::error::TimeParseError;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

pub const MINUTES_PER_DAY: i64 = 24 * 60;

lazy_static! {
    /// `H:MM` or `HH:MM`, optionally followed by AM/PM
    static ref TIME_PATTERN: Regex = Regex::new(r"(?i)^(\d{1,2}):(\d{2})\s*([ap]m)?$").unwrap();
}

/// Notation a time was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeStyle {
    /// 12-hour clock with an AM/PM marker
    Meridiem,
    TwentyFourHour,
}

impl TimeStyle {
    pub fn from_24h(use_24h: bool) -> Self {
        if use_24h {
            TimeStyle::TwentyFourHour
        } else {
            TimeStyle::Meridiem
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeOfDay {
    minutes: u16,
    style: TimeStyle,
}

impl TimeOfDay {
    /// Build from any minute count; values outside one day wrap around
    pub fn new(minutes: i64, style: TimeStyle) -> Self {
        Self {
            minutes: minutes.rem_euclid(MINUTES_PER_DAY) as u16,
            style,
        }
    }

    pub fn parse(text: &str) -> Result<Self, TimeParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TimeParseError::Empty);
        }

        let caps = TIME_PATTERN
            .captures(text)
            .ok_or_else(|| TimeParseError::Malformed(text.to_string()))?;

        let hour: u32 = caps[1]
            .parse()
            .map_err(|_| TimeParseError::Malformed(text.to_string()))?;
        let minute: u32 = caps[2]
            .parse()
            .map_err(|_| TimeParseError::Malformed(text.to_string()))?;

        if minute > 59 {
            return Err(TimeParseError::MinuteOutOfRange {
                minute,
                text: text.to_string(),
            });
        }

        match caps.get(3) {
            Some(marker) => {
                if !(1..=12).contains(&hour) {
                    return Err(TimeParseError::HourOutOfRange {
                        hour,
                        text: text.to_string(),
                    });
                }
                let pm = marker.as_str().eq_ignore_ascii_case("pm");
                let hour24 = (hour % 12) + if pm { 12 } else { 0 };
                Ok(Self::new((hour24 * 60 + minute) as i64, TimeStyle::Meridiem))
            }
            None => {
                if hour > 23 {
                    return Err(TimeParseError::HourOutOfRange {
                        hour,
                        text: text.to_string(),
                    });
                }
                Ok(Self::new((hour * 60 + minute) as i64, TimeStyle::TwentyFourHour))
            }
        }
    }

    /// Minutes since midnight, always below 1440
    pub fn minutes(&self) -> u16 {
        self.minutes
    }

    pub fn hour(&self) -> u16 {
        self.minutes / 60
    }

    pub fn minute(&self) -> u16 {
        self.minutes % 60
    }

    pub fn style(&self) -> TimeStyle {
        self.style
    }

    pub fn with_style(self, style: TimeStyle) -> Self {
        Self { style, ..self }
    }

    /// Shift by a signed number of minutes, wrapping at midnight
    pub fn offset(&self, delta_minutes: i64) -> Self {
        let delta = delta_minutes.rem_euclid(MINUTES_PER_DAY);
        Self::new(self.minutes as i64 + delta, self.style)
    }

    pub fn format(&self, style: TimeStyle) -> String {
        let (hour, minute) = (self.hour(), self.minute());
        match style {
            TimeStyle::TwentyFourHour => format!("{:02}:{:02}", hour, minute),
            TimeStyle::Meridiem => {
                let (hour12, marker) = match hour {
                    0 => (12, "AM"),
                    1..=11 => (hour, "AM"),
                    12 => (12, "PM"),
                    _ => (hour - 12, "PM"),
                };
                format!("{}:{:02} {}", hour12, minute, marker)
            }
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(self.style))
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse time text into minutes since midnight
pub fn parse_time_of_day(text: &str) -> Result<u16, TimeParseError> {
    TimeOfDay::parse(text).map(|t| t.minutes())
}

/// Format a minute count as time text. Hours wrap modulo 24.
pub fn format_time_of_day(minutes: i64, use_24h: bool) -> String {
    let style = TimeStyle::from_24h(use_24h);
    TimeOfDay::new(minutes, style).format(style)
}

/// Shift time text by `delta_minutes`, keeping the notation of `base`
///
/// Only the notation is kept, not the exact spelling: 24-hour output is
/// always zero-padded, so `"7:00"` comes back as `"07:00"`.
pub fn offset_time_of_day(base: &str, delta_minutes: i64) -> Result<String, TimeParseError> {
    TimeOfDay::parse(base).map(|t| t.offset(delta_minutes).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_meridiem_and_24h() {
        assert_eq!(parse_time_of_day("1:00 AM"), Ok(60));
        assert_eq!(parse_time_of_day("12:00 PM"), Ok(720));
        assert_eq!(parse_time_of_day("12:15 am"), Ok(15));
        assert_eq!(parse_time_of_day("7:30pm"), Ok(19 * 60 + 30));
        assert_eq!(parse_time_of_day("23:59"), Ok(1439));
        assert_eq!(parse_time_of_day("00:00"), Ok(0));
        assert_eq!(parse_time_of_day(" 9:05 "), Ok(545));
    }

    #[test]
    fn test_rejects_unparseable_text() {
        assert_eq!(parse_time_of_day(""), Err(TimeParseError::Empty));
        assert!(matches!(
            parse_time_of_day("noon"),
            Err(TimeParseError::Malformed(_))
        ));
        assert!(matches!(
            parse_time_of_day("9:5"),
            Err(TimeParseError::Malformed(_))
        ));
        assert!(matches!(
            parse_time_of_day("24:00"),
            Err(TimeParseError::HourOutOfRange { hour: 24, .. })
        ));
        assert!(matches!(
            parse_time_of_day("13:00 PM"),
            Err(TimeParseError::HourOutOfRange { hour: 13, .. })
        ));
        assert!(matches!(
            parse_time_of_day("0:30 AM"),
            Err(TimeParseError::HourOutOfRange { hour: 0, .. })
        ));
        assert!(matches!(
            parse_time_of_day("10:60"),
            Err(TimeParseError::MinuteOutOfRange { minute: 60, .. })
        ));
    }

    #[test]
    fn test_round_trip_reference_times() {
        for text in ["1:00 AM", "12:00 PM", "23:59", "00:00"] {
            let time = TimeOfDay::parse(text).unwrap();
            assert_eq!(time.to_string(), text);
        }
    }

    #[test]
    fn test_format_wraps_hours() {
        assert_eq!(format_time_of_day(0, false), "12:00 AM");
        assert_eq!(format_time_of_day(720, false), "12:00 PM");
        assert_eq!(format_time_of_day(13 * 60 + 5, false), "1:05 PM");
        assert_eq!(format_time_of_day(25 * 60, true), "01:00");
        assert_eq!(format_time_of_day(-30, true), "23:30");
    }

    #[test]
    fn test_offset_keeps_notation() {
        assert_eq!(offset_time_of_day("11:45 PM", 30).unwrap(), "12:15 AM");
        assert_eq!(offset_time_of_day("23:30", -30).unwrap(), "23:00");
        assert_eq!(offset_time_of_day("00:10", -20).unwrap(), "23:50");
        assert_eq!(offset_time_of_day("6:00 AM", 3 * 1440 + 90).unwrap(), "7:30 AM");
        assert!(offset_time_of_day("later", 10).is_err());
    }

    #[test]
    fn test_unpadded_24h_input_is_normalised() {
        assert_eq!(offset_time_of_day("7:00", 0).unwrap(), "07:00");
        assert_eq!(offset_time_of_day("7:00", 65).unwrap(), "08:05");
    }

    #[test]
    fn test_extreme_deltas_wrap_without_overflow() {
        let noon = TimeOfDay::parse("12:00").unwrap();
        assert_eq!(noon.offset(i64::MAX).to_string(), "06:07");
        assert_eq!(noon.offset(i64::MIN).to_string(), "17:52");
        assert_eq!(offset_time_of_day("11:59 PM", i64::MAX).unwrap(), "6:06 PM");
    }

    #[test]
    fn test_with_style_changes_rendering_only() {
        let time = TimeOfDay::parse("19:30").unwrap();
        let meridiem = time.with_style(TimeStyle::Meridiem);
        assert_eq!(meridiem.minutes(), time.minutes());
        assert_eq!(meridiem.to_string(), "7:30 PM");
        assert_eq!((time.hour(), time.minute()), (19, 30));
    }
}
