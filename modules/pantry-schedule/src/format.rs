//! Human-readable rendering of times and availability.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::calculator::LocalMoment;
use crate::types::{AvailabilityStatus, TimeOfDay, TimeRange};

/// `9 AM`, `12:30 PM`, `12 AM` (midnight). Minutes are omitted when zero.
pub fn format_time(time: TimeOfDay) -> String {
    let hour12 = match time.hour() % 12 {
        0 => 12,
        h => h,
    };
    let period = if time.hour() < 12 { "AM" } else { "PM" };
    if time.minute() > 0 {
        format!("{hour12}:{:02} {period}", time.minute())
    } else {
        format!("{hour12} {period}")
    }
}

/// `9 AM - 12 PM`. Round-trips through `parse_time_range`.
pub fn format_time_range(range: &TimeRange) -> String {
    format!("{} - {}", format_time(range.open), format_time(range.close))
}

/// Short zone name in effect at `at`, e.g. `PST` or `PDT`.
pub fn timezone_abbreviation(tz: Tz, at: DateTime<Utc>) -> String {
    at.with_timezone(&tz).format("%Z").to_string()
}

pub fn format_time_with_timezone(time: TimeOfDay, tz: Tz, at: DateTime<Utc>) -> String {
    format!("{} {}", format_time(time), timezone_abbreviation(tz, at))
}

/// `in 45m` under an hour, otherwise whole hours (`in 3h`).
pub fn format_relative_minutes(minutes: i64) -> String {
    if minutes < 60 {
        format!("in {minutes}m")
    } else {
        format!("in {}h", minutes / 60)
    }
}

/// One-line English label for a status as seen from `now` in `tz`.
pub fn status_label(status: &AvailabilityStatus, now: DateTime<Utc>, tz: Tz) -> String {
    match status {
        AvailabilityStatus::Open { closes_at } => {
            format!("Open until {}", format_time(LocalMoment::of(*closes_at, tz).time))
        }
        AvailabilityStatus::OpeningSoon { minutes_until, .. } => {
            format!("Opens {}", format_relative_minutes(i64::from(*minutes_until)))
        }
        AvailabilityStatus::Closed {
            opens_at: Some(opens_at),
        } => {
            let today = LocalMoment::of(now, tz).date;
            let opening = LocalMoment::of(*opens_at, tz);
            if opening.date == today {
                let minutes = (*opens_at - now).num_minutes();
                format!("Opens {}", format_relative_minutes(minutes))
            } else if today.succ_opt() == Some(opening.date) {
                format!("Opens tomorrow {}", format_time(opening.time))
            } else {
                format!(
                    "Opens {} {}",
                    opening.date.format("%a"),
                    format_time(opening.time)
                )
            }
        }
        AvailabilityStatus::Closed { opens_at: None } => "Closed".to_string(),
        AvailabilityStatus::Unknown => "Hours unknown".to_string(),
    }
}
