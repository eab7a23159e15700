//! Turns raw location schedule fields into a [`SchedulePattern`].
//!
//! Every function here returns `None` on unparseable input rather than an
//! error; [`parse_schedule`] falls back weekly → special → unknown so that
//! every input yields some pattern.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::Weekday;
use regex::Regex;
use tracing::debug;

use crate::types::{
    weekday_key, SchedulePattern, SpecialPattern, TimeOfDay, TimeRange, WeeklySchedule, WEEKDAYS,
};

/// Raw text stored for a location whose schedule text is empty.
pub const SCHEDULE_NOT_AVAILABLE: &str = "Schedule not available";

static TIME_OF_DAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})(?::(\d{2}))?\s*(am|pm|a\.m\.|p\.m\.)?$").unwrap()
});
static RANGE_SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*[-–—]\s*").unwrap());
static ORDINAL_WEEKDAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d+(?:st|nd|rd|th))(?:\s*(?:and|&|,)\s*(\d+(?:st|nd|rd|th)))?(?:\s*(?:and|&|,)\s*(\d+(?:st|nd|rd|th)))?\s+(sunday|monday|tuesday|wednesday|thursday|friday|saturday|sun|mon|tues|tue|wed|thurs|thur|thu|fri|sat)",
    )
    .unwrap()
});
static ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+)(?:st|nd|rd|th)$").unwrap());
static EMBEDDED_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d{1,2}(?::\d{2})?\s*(?:am|pm|a\.m\.|p\.m\.)?)\s*[-–—]\s*(\d{1,2}(?::\d{2})?\s*(?:am|pm|a\.m\.|p\.m\.)?)",
    )
    .unwrap()
});

/// Window used for a special pattern whose text names no parseable hours.
pub fn default_special_range() -> TimeRange {
    TimeRange {
        open: TimeOfDay::new(9, 0).unwrap_or(TimeOfDay::MIDNIGHT),
        close: TimeOfDay::new(12, 0).unwrap_or(TimeOfDay::MIDNIGHT),
    }
}

/// Parse `"9"`, `"9:00"`, `"9:00 AM"`, `"14:00"`, `"9 am"` or `"9:00 a.m."`.
pub fn parse_time_of_day(text: &str) -> Option<TimeOfDay> {
    let cleaned = text.trim().to_lowercase();
    let caps = TIME_OF_DAY_RE.captures(&cleaned)?;

    let mut hour: u8 = caps[1].parse().ok()?;
    let minute: u8 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    let period = caps.get(3).map(|p| p.as_str().replace('.', ""));

    match period.as_deref() {
        Some("pm") if hour < 12 => hour += 12,
        Some("am") if hour == 12 => hour = 0,
        _ => {}
    }

    TimeOfDay::new(hour, minute)
}

/// Parse `"9:00 - 12:00"` or `"9 AM – 2 PM"`. Only the first comma-separated
/// range is kept.
pub fn parse_time_range(text: &str) -> Option<TimeRange> {
    let first = text.split(',').next()?.trim();
    if first.is_empty() {
        return None;
    }

    let parts: Vec<&str> = RANGE_SEPARATOR_RE.split(first).collect();
    let [open, close] = parts.as_slice() else {
        return None;
    };

    Some(TimeRange {
        open: parse_time_of_day(open)?,
        close: parse_time_of_day(close)?,
    })
}

/// Parse each weekday column independently. Missing or empty columns are closed.
pub fn parse_weekly_schedule(day_fields: &BTreeMap<String, String>) -> WeeklySchedule {
    let mut schedule = WeeklySchedule::default();
    for weekday in WEEKDAYS {
        let range = day_fields
            .get(weekday_key(weekday))
            .and_then(|text| parse_time_range(text));
        schedule.set(weekday, range);
    }
    schedule
}

pub fn has_weekly_hours(schedule: &WeeklySchedule) -> bool {
    schedule.has_hours()
}

fn parse_weekday_name(name: &str) -> Option<Weekday> {
    match name.to_lowercase().as_str() {
        "sunday" | "sun" => Some(Weekday::Sun),
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thur" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        _ => None,
    }
}

/// `"3rd"` → 3. Values outside 1..=5 are rejected.
fn parse_ordinal(token: &str) -> Option<u8> {
    let caps = ORDINAL_RE.captures(token)?;
    let n: u8 = caps[1].parse().ok()?;
    (1..=5).contains(&n).then_some(n)
}

/// Parse text like "1st and 3rd Wednesday of the month from 12:00 - 2:00 p.m.".
pub fn parse_special_pattern(text: &str) -> Option<SpecialPattern> {
    let caps = ORDINAL_WEEKDAY_RE.captures(text)?;

    let occurrences: Vec<u8> = [caps.get(1), caps.get(2), caps.get(3)]
        .into_iter()
        .flatten()
        .filter_map(|m| parse_ordinal(m.as_str()))
        .collect();
    let weekday = parse_weekday_name(&caps[4])?;

    let time_range = EMBEDDED_RANGE_RE
        .captures(text)
        .and_then(|range| parse_time_range(&format!("{} - {}", &range[1], &range[2])))
        .unwrap_or_else(default_special_range);

    SpecialPattern::new(weekday, occurrences, time_range)
}

/// Pick the schedule representation for one location.
///
/// Day columns win whenever any of them has hours, even if `text` also
/// describes a special pattern.
pub fn parse_schedule(text: &str, day_fields: &BTreeMap<String, String>) -> SchedulePattern {
    let schedule = parse_weekly_schedule(day_fields);
    if schedule.has_hours() {
        return SchedulePattern::Weekly { schedule };
    }

    if !text.trim().is_empty() {
        if let Some(pattern) = parse_special_pattern(text) {
            return SchedulePattern::Special { pattern };
        }
        debug!(text, "Schedule text matched no known pattern");
    }

    let raw_text = if text.is_empty() {
        SCHEDULE_NOT_AVAILABLE.to_string()
    } else {
        text.to_string()
    };
    SchedulePattern::Unknown { raw_text }
}
