//! Availability evaluation.
//!
//! Everything here is a pure function of `(pattern, instant, timezone)`. The
//! instant is always projected into the location's IANA zone before any
//! calendar field is read, so results do not depend on the clock of the
//! machine doing the evaluation.

use chrono::{
    DateTime, Datelike, Days, Months, NaiveDate, Offset, TimeDelta, TimeZone, Timelike, Utc,
    Weekday,
};
use chrono_tz::Tz;

use crate::error::ScheduleError;
use crate::types::{
    AvailabilityStatus, SchedulePattern, SpecialPattern, TimeOfDay, TimeRange, WeeklySchedule,
};

/// Zone of the original single-region dataset. Only used as a config default;
/// every evaluation takes the zone explicitly.
pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

/// A closed location whose next window starts within this many minutes is "opening soon".
pub const OPENING_SOON_MINUTES: u32 = 30;

/// Calendar days, today included, searched for the next weekly opening.
pub const WEEKLY_LOOKAHEAD_DAYS: u64 = 7;

/// Calendar months (current included) searched for the next special opening.
pub const SPECIAL_LOOKAHEAD_MONTHS: u32 = 2;

/// Span covered by the "this week" filter.
pub const THIS_WEEK_DAYS: i64 = 7;

pub fn parse_timezone(name: &str) -> Result<Tz, ScheduleError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ScheduleError::InvalidTimezone(name.to_string()))
}

/// Wall-clock date and time of an instant as seen in a given zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalMoment {
    pub date: NaiveDate,
    pub time: TimeOfDay,
}

impl LocalMoment {
    /// Seconds are dropped: all schedule comparisons are at minute granularity.
    pub fn of(instant: DateTime<Utc>, tz: Tz) -> Self {
        let local = instant.with_timezone(&tz);
        // hour() < 24 and minute() < 60 by construction
        let time = TimeOfDay::new(local.hour() as u8, local.minute() as u8)
            .unwrap_or(TimeOfDay::MIDNIGHT);
        Self {
            date: local.date_naive(),
            time,
        }
    }

    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }
}

/// The absolute instant at which the wall clock in `tz` reads `time` on `date`.
///
/// Ambiguous times (clocks going back) resolve to the earlier instant. Times
/// skipped by a forward transition are read with the offset in force before
/// the jump, which lands just after it.
pub fn local_instant(tz: Tz, date: NaiveDate, time: TimeOfDay) -> DateTime<Utc> {
    let naive = date.and_time(time.to_naive_time());
    match tz.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => {
            let before = tz
                .offset_from_utc_datetime(&(naive - TimeDelta::days(1)))
                .fix();
            (naive - TimeDelta::seconds(i64::from(before.local_minus_utc()))).and_utc()
        }
    }
}

/// `open <= time < close`. Being exactly at the close minute is closed.
pub fn is_time_in_range(time: TimeOfDay, range: &TimeRange) -> bool {
    range.open <= time && time < range.close
}

/// Minutes until `open` when it is 1..=30 minutes ahead of `now`.
fn minutes_until_soon(now: TimeOfDay, open: TimeOfDay) -> Option<u32> {
    let until = open.minutes().checked_sub(now.minutes())?;
    (1..=OPENING_SOON_MINUTES).contains(&until).then_some(until)
}

/// Date of the `n`th `weekday` in the month, e.g. the 1st Wednesday of January 2024.
///
/// `None` when `n` is outside 1..=5 or the month has no such occurrence.
pub fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    if !(1..=5).contains(&n) {
        return None;
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = (7 + weekday.num_days_from_sunday() - first.weekday().num_days_from_sunday()) % 7;
    let day = 1 + offset + (u32::from(n) - 1) * 7;
    // from_ymd_opt rejects days past the end of the month
    NaiveDate::from_ymd_opt(year, month, day)
}

/// True if `date` is one of the pattern's configured occurrences.
pub fn occurs_on(pattern: &SpecialPattern, date: NaiveDate) -> bool {
    if date.weekday() != pattern.weekday {
        return false;
    }
    pattern
        .occurrences
        .iter()
        .any(|&n| nth_weekday_of_month(date.year(), date.month(), pattern.weekday, n) == Some(date))
}

/// Evaluate a schedule at `now` in `tz`.
pub fn evaluate(pattern: &SchedulePattern, now: DateTime<Utc>, tz: Tz) -> AvailabilityStatus {
    let moment = LocalMoment::of(now, tz);
    match pattern {
        SchedulePattern::Weekly { schedule } => evaluate_weekly(schedule, moment, tz),
        SchedulePattern::Special { pattern } => evaluate_special(pattern, moment, tz),
        SchedulePattern::Unknown { .. } => AvailabilityStatus::Unknown,
    }
}

/// Status for a window that applies to `moment.date`, if it is open or about to open.
fn status_within_day(
    range: &TimeRange,
    moment: LocalMoment,
    tz: Tz,
) -> Option<AvailabilityStatus> {
    if is_time_in_range(moment.time, range) {
        return Some(AvailabilityStatus::Open {
            closes_at: local_instant(tz, moment.date, range.close),
        });
    }
    let minutes_until = minutes_until_soon(moment.time, range.open)?;
    Some(AvailabilityStatus::OpeningSoon {
        opens_at: local_instant(tz, moment.date, range.open),
        minutes_until,
    })
}

fn evaluate_weekly(schedule: &WeeklySchedule, moment: LocalMoment, tz: Tz) -> AvailabilityStatus {
    if let Some(status) = schedule
        .get(moment.weekday())
        .and_then(|today| status_within_day(today, moment, tz))
    {
        return status;
    }
    AvailabilityStatus::Closed {
        opens_at: next_weekly_opening(schedule, moment, tz),
    }
}

/// Today (only if the opening is still ahead), then the next six days.
/// A schedule whose only day is today, already past, has no next opening.
fn next_weekly_opening(
    schedule: &WeeklySchedule,
    moment: LocalMoment,
    tz: Tz,
) -> Option<DateTime<Utc>> {
    (0..WEEKLY_LOOKAHEAD_DAYS).find_map(|offset| {
        let date = moment.date.checked_add_days(Days::new(offset))?;
        let range = schedule.get(date.weekday())?;
        if offset == 0 && range.open <= moment.time {
            return None;
        }
        Some(local_instant(tz, date, range.open))
    })
}

fn evaluate_special(pattern: &SpecialPattern, moment: LocalMoment, tz: Tz) -> AvailabilityStatus {
    if occurs_on(pattern, moment.date) {
        if let Some(status) = status_within_day(&pattern.time_range, moment, tz) {
            return status;
        }
    }
    AvailabilityStatus::Closed {
        opens_at: next_special_opening(pattern, moment, tz),
    }
}

/// Earliest future occurrence in the current month, then the next one.
fn next_special_opening(
    pattern: &SpecialPattern,
    moment: LocalMoment,
    tz: Tz,
) -> Option<DateTime<Utc>> {
    let open = pattern.time_range.open;
    let month_start = moment.date.with_day(1)?;

    for month_offset in 0..SPECIAL_LOOKAHEAD_MONTHS {
        let month = month_start.checked_add_months(Months::new(month_offset))?;
        let next = pattern
            .occurrences
            .iter()
            .filter_map(|&n| nth_weekday_of_month(month.year(), month.month(), pattern.weekday, n))
            .filter(|&date| date > moment.date || (date == moment.date && open > moment.time))
            .min();
        if let Some(date) = next {
            return Some(local_instant(tz, date, open));
        }
    }
    None
}

/// Whether the schedule has any hours on a local calendar date.
pub fn is_open_on_date(pattern: &SchedulePattern, date: NaiveDate) -> bool {
    match pattern {
        SchedulePattern::Weekly { schedule } => schedule.get(date.weekday()).is_some(),
        SchedulePattern::Special { pattern } => occurs_on(pattern, date),
        SchedulePattern::Unknown { .. } => false,
    }
}

/// Whether the schedule has hours on the day `at` falls on in `tz`.
pub fn is_open_on_day(pattern: &SchedulePattern, at: DateTime<Utc>, tz: Tz) -> bool {
    is_open_on_date(pattern, LocalMoment::of(at, tz).date)
}

/// True if any local calendar day from `start` to `end` (both inclusive) has hours.
pub fn is_open_in_range(
    pattern: &SchedulePattern,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    tz: Tz,
) -> bool {
    let last = LocalMoment::of(end, tz).date;
    LocalMoment::of(start, tz)
        .date
        .iter_days()
        .take_while(|date| *date <= last)
        .any(|date| is_open_on_date(pattern, date))
}

pub fn is_open_now(pattern: &SchedulePattern, now: DateTime<Utc>, tz: Tz) -> bool {
    evaluate(pattern, now, tz).is_open()
}

pub fn is_open_today(pattern: &SchedulePattern, now: DateTime<Utc>, tz: Tz) -> bool {
    is_open_on_day(pattern, now, tz)
}

pub fn is_open_tomorrow(pattern: &SchedulePattern, now: DateTime<Utc>, tz: Tz) -> bool {
    LocalMoment::of(now, tz)
        .date
        .succ_opt()
        .is_some_and(|tomorrow| is_open_on_date(pattern, tomorrow))
}

/// Unknown schedules always count as open this week so the broadest filter
/// never hides them.
pub fn is_open_this_week(pattern: &SchedulePattern, now: DateTime<Utc>, tz: Tz) -> bool {
    if matches!(pattern, SchedulePattern::Unknown { .. }) {
        return true;
    }
    is_open_in_range(pattern, now, now + TimeDelta::days(THIS_WEEK_DAYS), tz)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(hour: u8, minute: u8) -> TimeOfDay {
        TimeOfDay::new(hour, minute).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn time_in_range_excludes_close() {
        let range = TimeRange::new(t(9, 0), t(12, 0));
        assert!(is_time_in_range(t(9, 0), &range));
        assert!(is_time_in_range(t(11, 59), &range));
        assert!(!is_time_in_range(t(12, 0), &range));
        assert!(!is_time_in_range(t(8, 59), &range));
    }

    #[test]
    fn nth_weekday_first_and_fifth() {
        assert_eq!(nth_weekday_of_month(2024, 1, Weekday::Wed, 1), Some(date(2024, 1, 3)));
        assert_eq!(nth_weekday_of_month(2024, 1, Weekday::Wed, 5), Some(date(2024, 1, 31)));
        assert_eq!(nth_weekday_of_month(2024, 1, Weekday::Sun, 1), Some(date(2024, 1, 7)));
    }

    #[test]
    fn nth_weekday_missing_occurrence() {
        assert_eq!(nth_weekday_of_month(2024, 2, Weekday::Wed, 5), None);
    }

    #[test]
    fn nth_weekday_out_of_range_n() {
        assert_eq!(nth_weekday_of_month(2024, 1, Weekday::Wed, 0), None);
        assert_eq!(nth_weekday_of_month(2024, 1, Weekday::Wed, 6), None);
    }

    #[test]
    fn nth_weekday_when_month_starts_on_that_weekday() {
        // May 2024 starts on a Wednesday
        assert_eq!(nth_weekday_of_month(2024, 5, Weekday::Wed, 1), Some(date(2024, 5, 1)));
        assert_eq!(nth_weekday_of_month(2024, 5, Weekday::Wed, 5), Some(date(2024, 5, 29)));
    }

    #[test]
    fn parse_timezone_accepts_iana_names() {
        assert_eq!(parse_timezone(DEFAULT_TIMEZONE), Ok(Tz::America__Los_Angeles));
        assert_eq!(
            parse_timezone("Mars/Olympus_Mons"),
            Err(ScheduleError::InvalidTimezone("Mars/Olympus_Mons".to_string()))
        );
    }

    #[test]
    fn local_instant_follows_dst() {
        let tz = Tz::America__Los_Angeles;
        // PST, UTC-8
        assert_eq!(
            local_instant(tz, date(2024, 1, 3), t(9, 0)).to_rfc3339(),
            "2024-01-03T17:00:00+00:00"
        );
        // PDT, UTC-7
        assert_eq!(
            local_instant(tz, date(2024, 7, 3), t(9, 0)).to_rfc3339(),
            "2024-07-03T16:00:00+00:00"
        );
    }

    #[test]
    fn local_instant_inside_spring_forward_gap() {
        let tz = Tz::America__Los_Angeles;
        // 2:30 does not exist on 2024-03-10; it reads as 3:30 PDT
        assert_eq!(
            local_instant(tz, date(2024, 3, 10), t(2, 30)).to_rfc3339(),
            "2024-03-10T10:30:00+00:00"
        );
    }

    #[test]
    fn local_instant_ambiguous_fall_back_takes_earliest() {
        let tz = Tz::America__Los_Angeles;
        // 1:30 happens twice on 2024-11-03; first is PDT
        assert_eq!(
            local_instant(tz, date(2024, 11, 3), t(1, 30)).to_rfc3339(),
            "2024-11-03T08:30:00+00:00"
        );
    }

    #[test]
    fn local_moment_reads_wall_clock_in_zone() {
        let instant = DateTime::parse_from_rfc3339("2024-01-04T03:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let moment = LocalMoment::of(instant, Tz::America__Los_Angeles);
        assert_eq!(moment.date, date(2024, 1, 3));
        assert_eq!(moment.time, t(19, 0));
        assert_eq!(moment.weekday(), Weekday::Wed);
    }
}
