use chrono::{DateTime, TimeDelta, Utc};
use pantry_schedule::AvailabilityStatus;

use crate::display::DisplayLocation;

/// Default number of entries in the "next available" strip.
pub const DEFAULT_TIMELINE_LIMIT: usize = 5;

/// Closed locations only make the strip if they open within this window.
pub const TIMELINE_HORIZON: TimeDelta = TimeDelta::hours(24);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpcomingOpening<'a> {
    pub location: &'a DisplayLocation,
    /// `now` for locations already open
    pub opens_at: DateTime<Utc>,
    /// 0 for locations already open
    pub minutes_until: i64,
}

impl UpcomingOpening<'_> {
    pub fn is_open(&self) -> bool {
        self.minutes_until == 0
    }
}

/// Locations open now or opening within the next day, soonest first.
pub fn upcoming_openings(
    display: &[DisplayLocation],
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<UpcomingOpening<'_>> {
    let horizon = TIMELINE_HORIZON.num_minutes();
    let mut openings: Vec<UpcomingOpening<'_>> = display
        .iter()
        .filter_map(|location| {
            let (opens_at, minutes_until) = match location.availability {
                AvailabilityStatus::Open { .. } => (now, 0),
                AvailabilityStatus::OpeningSoon {
                    opens_at,
                    minutes_until,
                } => (opens_at, i64::from(minutes_until)),
                AvailabilityStatus::Closed {
                    opens_at: Some(opens_at),
                } => {
                    let minutes = (opens_at - now).num_minutes();
                    if minutes <= 0 || minutes > horizon {
                        return None;
                    }
                    (opens_at, minutes)
                }
                AvailabilityStatus::Closed { opens_at: None } | AvailabilityStatus::Unknown => {
                    return None
                }
            };
            Some(UpcomingOpening {
                location,
                opens_at,
                minutes_until,
            })
        })
        .collect();

    openings.sort_by_key(|opening| opening.minutes_until);
    openings.truncate(limit);
    openings
}
