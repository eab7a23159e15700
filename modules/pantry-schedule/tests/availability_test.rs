//! Availability contract tests.
//!
//! Instants are built from Pacific wall-clock times so each case reads the way
//! a pantry volunteer would describe it ("Wednesday at 8:45").

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

use pantry_schedule::{
    evaluate, format_time_range, is_open_in_range, is_open_now, is_open_on_day, is_open_this_week,
    is_open_today, is_open_tomorrow, local_instant, parse_time_range, AvailabilityStatus,
    SchedulePattern, SpecialPattern, TimeOfDay, TimeRange, WeeklySchedule,
};

const LA: Tz = Tz::America__Los_Angeles;

fn t(hour: u8, minute: u8) -> TimeOfDay {
    TimeOfDay::new(hour, minute).unwrap()
}

fn pacific(y: i32, m: u32, d: u32, hour: u8, minute: u8) -> DateTime<Utc> {
    local_instant(LA, NaiveDate::from_ymd_opt(y, m, d).unwrap(), t(hour, minute))
}

fn utc(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
}

fn weekly_on(day: Weekday, open_hour: u8, close_hour: u8) -> SchedulePattern {
    let mut schedule = WeeklySchedule::default();
    schedule.set(day, Some(TimeRange::new(t(open_hour, 0), t(close_hour, 0))));
    SchedulePattern::Weekly { schedule }
}

fn special(weekday: Weekday, occurrences: &[u8], open_hour: u8, close_hour: u8) -> SchedulePattern {
    SchedulePattern::Special {
        pattern: SpecialPattern::new(
            weekday,
            occurrences.iter().copied(),
            TimeRange::new(t(open_hour, 0), t(close_hour, 0)),
        )
        .unwrap(),
    }
}

fn unknown() -> SchedulePattern {
    SchedulePattern::Unknown {
        raw_text: "Call for hours".to_string(),
    }
}

// =========================================================================
// Weekly schedules
// =========================================================================

#[test]
fn weekly_open_inside_window() {
    let status = evaluate(&weekly_on(Weekday::Wed, 9, 12), pacific(2024, 1, 3, 10, 0), LA);
    assert_eq!(
        status,
        AvailabilityStatus::Open {
            closes_at: utc("2024-01-03T20:00:00Z")
        }
    );
}

#[test]
fn weekly_closed_at_exact_close_minute() {
    let status = evaluate(&weekly_on(Weekday::Wed, 9, 12), pacific(2024, 1, 3, 12, 0), LA);
    assert!(matches!(status, AvailabilityStatus::Closed { .. }));
}

#[test]
fn weekly_opening_soon_fifteen_minutes_out() {
    let status = evaluate(&weekly_on(Weekday::Wed, 9, 12), pacific(2024, 1, 3, 8, 45), LA);
    assert_eq!(
        status,
        AvailabilityStatus::OpeningSoon {
            opens_at: utc("2024-01-03T17:00:00Z"),
            minutes_until: 15,
        }
    );
}

#[test]
fn weekly_opening_soon_boundary_is_thirty_minutes() {
    let schedule = weekly_on(Weekday::Wed, 9, 12);
    assert!(evaluate(&schedule, pacific(2024, 1, 3, 8, 30), LA).is_opening_soon());
    assert!(!evaluate(&schedule, pacific(2024, 1, 3, 8, 29), LA).is_opening_soon());
}

#[test]
fn weekly_more_than_thirty_minutes_out_is_closed_later_today() {
    let status = evaluate(&weekly_on(Weekday::Wed, 9, 12), pacific(2024, 1, 3, 8, 0), LA);
    assert_eq!(
        status,
        AvailabilityStatus::Closed {
            opens_at: Some(utc("2024-01-03T17:00:00Z"))
        }
    );
}

#[test]
fn weekly_wrong_day_points_at_next_matching_day() {
    // Tuesday; next opening is Wednesday 9:00 PST
    let status = evaluate(&weekly_on(Weekday::Wed, 9, 12), pacific(2024, 1, 2, 10, 0), LA);
    assert_eq!(
        status,
        AvailabilityStatus::Closed {
            opens_at: Some(pacific(2024, 1, 3, 9, 0))
        }
    );
}

#[test]
fn weekly_single_day_after_close_has_no_next_opening() {
    // Wednesday-only; next Wednesday is outside the 7-day window
    let status = evaluate(&weekly_on(Weekday::Wed, 9, 12), pacific(2024, 1, 3, 13, 0), LA);
    assert_eq!(status, AvailabilityStatus::Closed { opens_at: None });
}

#[test]
fn weekly_after_close_finds_a_later_day_within_six_days() {
    let mut schedule = WeeklySchedule::default();
    schedule.set(Weekday::Wed, Some(TimeRange::new(t(9, 0), t(12, 0))));
    schedule.set(Weekday::Tue, Some(TimeRange::new(t(9, 0), t(12, 0))));
    // Wednesday 13:00; Tuesday is six days ahead
    let status = evaluate(
        &SchedulePattern::Weekly { schedule },
        pacific(2024, 1, 3, 13, 0),
        LA,
    );
    assert_eq!(
        status,
        AvailabilityStatus::Closed {
            opens_at: Some(utc("2024-01-09T17:00:00Z"))
        }
    );
}

#[test]
fn weekly_without_hours_has_no_next_opening() {
    let pattern = SchedulePattern::Weekly {
        schedule: WeeklySchedule::default(),
    };
    assert_eq!(
        evaluate(&pattern, pacific(2024, 1, 3, 10, 0), LA),
        AvailabilityStatus::Closed { opens_at: None }
    );
}

#[test]
fn weekly_next_opening_across_spring_forward() {
    // Saturday before DST starts; Sunday 9:00 is PDT (UTC-7)
    let status = evaluate(&weekly_on(Weekday::Sun, 9, 12), pacific(2024, 3, 9, 10, 0), LA);
    assert_eq!(
        status,
        AvailabilityStatus::Closed {
            opens_at: Some(utc("2024-03-10T16:00:00Z"))
        }
    );
}

#[test]
fn evaluation_uses_the_location_zone_not_utc() {
    // 17:30 UTC is 9:30 in Los Angeles but 12:30 in New York
    let now = utc("2024-01-03T17:30:00Z");
    let schedule = weekly_on(Weekday::Wed, 9, 12);
    assert!(is_open_now(&schedule, now, LA));
    assert!(!is_open_now(&schedule, now, Tz::America__New_York));
}

#[test]
fn local_day_differs_from_utc_day() {
    // Thursday 07:30 UTC is still Wednesday evening in Los Angeles
    let now = utc("2024-01-04T07:30:00Z");
    let schedule = weekly_on(Weekday::Wed, 9, 12);
    assert!(is_open_today(&schedule, now, LA));
    assert!(!is_open_today(&schedule, now, Tz::UTC));
}

// =========================================================================
// Special (nth weekday) patterns
// =========================================================================

#[test]
fn special_open_on_first_wednesday() {
    let status = evaluate(&special(Weekday::Wed, &[1, 3], 9, 12), pacific(2024, 1, 3, 10, 0), LA);
    assert_eq!(
        status,
        AvailabilityStatus::Open {
            closes_at: pacific(2024, 1, 3, 12, 0)
        }
    );
}

#[test]
fn special_closed_on_non_matching_occurrence() {
    // 2nd Wednesday; next is the 3rd (Jan 17)
    let status = evaluate(&special(Weekday::Wed, &[1, 3], 9, 12), pacific(2024, 1, 10, 10, 0), LA);
    assert_eq!(
        status,
        AvailabilityStatus::Closed {
            opens_at: Some(pacific(2024, 1, 17, 9, 0))
        }
    );
}

#[test]
fn special_opening_soon_before_window() {
    let status = evaluate(&special(Weekday::Wed, &[1, 3], 9, 12), pacific(2024, 1, 3, 8, 45), LA);
    assert_eq!(
        status,
        AvailabilityStatus::OpeningSoon {
            opens_at: pacific(2024, 1, 3, 9, 0),
            minutes_until: 15,
        }
    );
}

#[test]
fn special_rolls_over_to_next_month() {
    // After the 3rd Wednesday of January, next is Feb 7 (1st Wednesday)
    let status = evaluate(&special(Weekday::Wed, &[1, 3], 9, 12), pacific(2024, 1, 17, 13, 0), LA);
    assert_eq!(
        status,
        AvailabilityStatus::Closed {
            opens_at: Some(utc("2024-02-07T17:00:00Z"))
        }
    );
}

#[test]
fn special_rolls_over_year_end() {
    // 2nd Friday of January 2025 is Jan 10
    let status = evaluate(&special(Weekday::Fri, &[2], 9, 12), pacific(2024, 12, 20, 10, 0), LA);
    assert_eq!(
        status,
        AvailabilityStatus::Closed {
            opens_at: Some(pacific(2025, 1, 10, 9, 0))
        }
    );
}

#[test]
fn special_fifth_occurrence_absent_in_lookahead() {
    // Jan 31 is the last 5th Wednesday until May; Feb and Mar 2024 have none
    let status = evaluate(&special(Weekday::Wed, &[5], 9, 12), pacific(2024, 1, 31, 13, 0), LA);
    assert_eq!(status, AvailabilityStatus::Closed { opens_at: None });
}

// =========================================================================
// Unknown schedules and day predicates
// =========================================================================

#[test]
fn unknown_schedule_is_unknown() {
    assert_eq!(
        evaluate(&unknown(), pacific(2024, 1, 3, 10, 0), LA),
        AvailabilityStatus::Unknown
    );
    assert!(!is_open_on_day(&unknown(), pacific(2024, 1, 3, 10, 0), LA));
}

#[test]
fn unknown_schedule_always_counts_this_week() {
    for now in [
        utc("2024-01-03T17:30:00Z"),
        utc("1999-12-31T23:59:59Z"),
        utc("2030-06-15T04:00:00Z"),
    ] {
        for tz in [LA, Tz::America__Chicago, Tz::Pacific__Auckland, Tz::UTC] {
            for raw_text in ["", "Call for hours", "Schedule not available"] {
                let pattern = SchedulePattern::Unknown {
                    raw_text: raw_text.to_string(),
                };
                assert!(is_open_this_week(&pattern, now, tz));
            }
        }
    }
}

#[test]
fn open_today_and_tomorrow() {
    let wednesday = weekly_on(Weekday::Wed, 9, 12);
    assert!(is_open_today(&wednesday, pacific(2024, 1, 3, 6, 0), LA));
    assert!(!is_open_today(&weekly_on(Weekday::Tue, 9, 12), pacific(2024, 1, 3, 10, 0), LA));
    assert!(is_open_tomorrow(&wednesday, pacific(2024, 1, 2, 10, 0), LA));
    assert!(!is_open_tomorrow(&wednesday, pacific(2024, 1, 3, 10, 0), LA));
}

#[test]
fn open_on_day_for_special_pattern() {
    let pattern = special(Weekday::Wed, &[1, 3], 9, 12);
    assert!(is_open_on_day(&pattern, pacific(2024, 1, 3, 10, 0), LA));
    assert!(!is_open_on_day(&pattern, pacific(2024, 1, 10, 10, 0), LA));
    assert!(!is_open_on_day(&pattern, pacific(2024, 1, 4, 10, 0), LA));
}

#[test]
fn open_in_range_is_inclusive_by_day() {
    let wednesday = weekly_on(Weekday::Wed, 9, 12);
    assert!(is_open_in_range(&wednesday, pacific(2024, 1, 1, 10, 0), pacific(2024, 1, 5, 10, 0), LA));
    assert!(!is_open_in_range(&wednesday, pacific(2024, 1, 4, 10, 0), pacific(2024, 1, 5, 10, 0), LA));
    // End instant earlier in the day than start still includes the end date
    assert!(is_open_in_range(&wednesday, pacific(2024, 1, 1, 18, 0), pacific(2024, 1, 3, 6, 0), LA));
}

#[test]
fn open_this_week_spans_seven_days() {
    let wednesday = weekly_on(Weekday::Wed, 9, 12);
    assert!(is_open_this_week(&wednesday, pacific(2024, 1, 1, 10, 0), LA));

    // 4th Wednesday only; from Jan 1 the next is Jan 24, outside the week
    let fourth = special(Weekday::Wed, &[4], 9, 12);
    assert!(!is_open_this_week(&fourth, pacific(2024, 1, 1, 10, 0), LA));
    assert!(is_open_this_week(&fourth, pacific(2024, 1, 20, 10, 0), LA));
}

// =========================================================================
// Properties
// =========================================================================

#[test]
fn evaluation_is_idempotent() {
    let now = pacific(2024, 1, 3, 8, 45);
    for pattern in [
        weekly_on(Weekday::Wed, 9, 12),
        special(Weekday::Wed, &[1, 3], 9, 12),
        unknown(),
    ] {
        let first = evaluate(&pattern, now, LA);
        for _ in 0..3 {
            assert_eq!(evaluate(&pattern, now, LA), first);
        }
    }
}

#[test]
fn formatted_ranges_parse_back() {
    for open_hour in 0..23u8 {
        for minute in [0u8, 15, 30, 45] {
            let range = TimeRange::new(t(open_hour, minute), t(open_hour + 1, minute));
            assert_eq!(parse_time_range(&format_time_range(&range)), Some(range));
        }
    }
}
