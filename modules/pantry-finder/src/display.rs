use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use pantry_common::{
    haversine_distance_miles, Coordinates, FinderError, FoodLocation, TimeFilter,
};
use pantry_schedule::{evaluate, AvailabilityStatus};

/// A visible location with everything the list needs for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayLocation {
    #[serde(flatten)]
    pub location: FoodLocation,
    pub availability: AvailabilityStatus,
    /// Miles from the user, when both ends have coordinates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

/// Drop hidden locations, then evaluate availability and distance for the rest.
pub fn derive_display_locations(
    locations: &[FoodLocation],
    now: DateTime<Utc>,
    tz: Tz,
    user: Option<Coordinates>,
) -> Vec<DisplayLocation> {
    let display: Vec<DisplayLocation> = locations
        .iter()
        .filter(|location| !location.hidden)
        .map(|location| DisplayLocation {
            availability: evaluate(&location.schedule, now, tz),
            distance: user
                .zip(location.coordinates)
                .map(|(from, to)| haversine_distance_miles(from, to)),
            location: location.clone(),
        })
        .collect();

    let with_coordinates = display
        .iter()
        .filter(|d| d.location.coordinates.is_some())
        .count();
    let visible = display.len();
    let hidden = locations.len() - visible;
    info!(
        visible,
        hidden,
        with_coordinates,
        "Derived display locations"
    );
    display
}

/// Locations whose schedule satisfies `filter` at `now`.
pub fn filter_locations<'a>(
    display: &'a [DisplayLocation],
    filter: TimeFilter,
    now: DateTime<Utc>,
    tz: Tz,
) -> Vec<&'a DisplayLocation> {
    let matching: Vec<&DisplayLocation> = display
        .iter()
        .filter(|d| filter.matches(&d.location.schedule, now, tz))
        .collect();
    debug!(filter = %filter, matching = matching.len(), "Applied time filter");
    matching
}

fn status_rank(status: &AvailabilityStatus) -> u8 {
    match status {
        AvailabilityStatus::Open { .. } => 0,
        AvailabilityStatus::OpeningSoon { .. } => 1,
        AvailabilityStatus::Closed { .. } | AvailabilityStatus::Unknown => 2,
    }
}

/// List order: open, then opening soon, then the rest. Within a group,
/// locations with a distance come first, nearest first; ties and locations
/// without a distance go by English name.
///
/// Measured-before-unmeasured is intentional: without it this is not a total
/// order, which `sort_by` requires.
pub fn compare_for_display(a: &DisplayLocation, b: &DisplayLocation) -> Ordering {
    status_rank(&a.availability)
        .cmp(&status_rank(&b.availability))
        .then_with(|| match (a.distance, b.distance) {
            (Some(da), Some(db)) => da.total_cmp(&db),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.location.name.en.cmp(&b.location.name.en))
}

pub fn sort_locations(locations: &mut [&DisplayLocation]) {
    locations.sort_by(|a, b| compare_for_display(a, b));
}

/// Distance band from the user. Bands are half-open: 2.0 mi is `Under5`,
/// 5.0 mi is `Over5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceRing {
    #[serde(rename = "under2")]
    Under2,
    #[serde(rename = "under5")]
    Under5,
    #[serde(rename = "over5")]
    Over5,
}

impl DistanceRing {
    pub const ALL: [DistanceRing; 3] = [
        DistanceRing::Under2,
        DistanceRing::Under5,
        DistanceRing::Over5,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceRing::Under2 => "under2",
            DistanceRing::Under5 => "under5",
            DistanceRing::Over5 => "over5",
        }
    }

    pub fn contains(&self, miles: f64) -> bool {
        match self {
            DistanceRing::Under2 => miles < 2.0,
            DistanceRing::Under5 => (2.0..5.0).contains(&miles),
            DistanceRing::Over5 => miles >= 5.0,
        }
    }
}

impl fmt::Display for DistanceRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceRing {
    type Err = FinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DistanceRing::ALL
            .into_iter()
            .find(|ring| ring.as_str() == s.trim())
            .ok_or_else(|| FinderError::UnknownFilter(s.to_string()))
    }
}

/// Keep locations inside `ring`. Locations without a distance never match a
/// ring; `None` keeps everything.
pub fn filter_by_distance_ring<'a>(
    locations: &[&'a DisplayLocation],
    ring: Option<DistanceRing>,
) -> Vec<&'a DisplayLocation> {
    let Some(ring) = ring else {
        return locations.to_vec();
    };
    locations
        .iter()
        .copied()
        .filter(|d| d.distance.is_some_and(|miles| ring.contains(miles)))
        .collect()
}

/// With `no_requirements`, keep only locations that list no eligibility rules.
pub fn filter_by_eligibility<'a>(
    locations: &[&'a DisplayLocation],
    no_requirements: bool,
) -> Vec<&'a DisplayLocation> {
    locations
        .iter()
        .copied()
        .filter(|d| !no_requirements || !has_eligibility_rules(&d.location))
        .collect()
}

fn has_eligibility_rules(location: &FoodLocation) -> bool {
    location
        .eligibility
        .as_ref()
        .is_some_and(|text| !text.en.trim().is_empty())
}

/// Number of visible locations each time filter would show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FilterCounts {
    pub open_now: usize,
    pub today: usize,
    pub tomorrow: usize,
    pub this_week: usize,
}

impl FilterCounts {
    pub fn compute(display: &[DisplayLocation], now: DateTime<Utc>, tz: Tz) -> Self {
        let count = |filter: TimeFilter| {
            display
                .iter()
                .filter(|d| filter.matches(&d.location.schedule, now, tz))
                .count()
        };
        Self {
            open_now: count(TimeFilter::OpenNow),
            today: count(TimeFilter::Today),
            tomorrow: count(TimeFilter::Tomorrow),
            this_week: count(TimeFilter::ThisWeek),
        }
    }

    pub fn get(&self, filter: TimeFilter) -> usize {
        match filter {
            TimeFilter::OpenNow => self.open_now,
            TimeFilter::Today => self.today,
            TimeFilter::Tomorrow => self.tomorrow,
            TimeFilter::ThisWeek => self.this_week,
        }
    }
}
