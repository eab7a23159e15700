use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use pantry_schedule::{
    is_open_now, is_open_this_week, is_open_today, is_open_tomorrow, parse_schedule,
    SchedulePattern,
};

use crate::error::FinderError;

/// Text shown in English and Spanish. Spanish may be blank in source data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BilingualText {
    pub en: String,
    #[serde(default)]
    pub es: String,
}

impl BilingualText {
    pub fn new(en: impl Into<String>, es: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            es: es.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceTag {
    #[serde(rename = "Walk-up")]
    WalkUp,
    #[serde(rename = "Drive-through")]
    DriveThrough,
}

/// One location as it appears in the dataset.
///
/// The schedule is either already structured (`schedule`) or given raw as
/// weekday columns (`hours`) plus free text (`rawScheduleText`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub id: String,
    pub name: BilingualText,
    #[serde(default)]
    pub description: BilingualText,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<SchedulePattern>,
    /// Weekday name (lowercase) → range text, e.g. `"monday": "9:00 - 12:00"`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hours: BTreeMap<String, String>,
    #[serde(default)]
    pub raw_schedule_text: BilingualText,
    #[serde(default)]
    pub closures: Option<BilingualText>,
    #[serde(default)]
    pub eligibility: Option<BilingualText>,
    #[serde(default)]
    pub tags: Vec<ServiceTag>,
    #[serde(default)]
    pub hidden: bool,
}

impl LocationRecord {
    /// Resolve the record's schedule, parsing the raw fields if it has no
    /// structured one.
    pub fn into_location(self) -> FoodLocation {
        let schedule = match self.schedule {
            Some(schedule) => schedule,
            None => parse_schedule(&self.raw_schedule_text.en, &self.hours),
        };

        FoodLocation {
            id: self.id,
            name: self.name,
            description: self.description,
            address: self.address,
            city: self.city,
            state: self.state,
            postcode: self.postcode,
            coordinates: self.coordinates,
            phone: self.phone,
            website: self.website,
            schedule,
            raw_schedule_text: self.raw_schedule_text,
            closures: self.closures,
            eligibility: self.eligibility,
            tags: self.tags,
            hidden: self.hidden,
        }
    }
}

/// A location with a resolved schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodLocation {
    pub id: String,
    pub name: BilingualText,
    pub description: BilingualText,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub schedule: SchedulePattern,
    pub raw_schedule_text: BilingualText,
    pub closures: Option<BilingualText>,
    pub eligibility: Option<BilingualText>,
    pub tags: Vec<ServiceTag>,
    pub hidden: bool,
}

// --- Time filters ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeFilter {
    #[default]
    OpenNow,
    Today,
    Tomorrow,
    ThisWeek,
}

impl TimeFilter {
    pub const ALL: [TimeFilter; 4] = [
        TimeFilter::OpenNow,
        TimeFilter::Today,
        TimeFilter::Tomorrow,
        TimeFilter::ThisWeek,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFilter::OpenNow => "open-now",
            TimeFilter::Today => "today",
            TimeFilter::Tomorrow => "tomorrow",
            TimeFilter::ThisWeek => "this-week",
        }
    }

    pub fn matches(&self, schedule: &SchedulePattern, now: DateTime<Utc>, tz: Tz) -> bool {
        match self {
            TimeFilter::OpenNow => is_open_now(schedule, now, tz),
            TimeFilter::Today => is_open_today(schedule, now, tz),
            TimeFilter::Tomorrow => is_open_tomorrow(schedule, now, tz),
            TimeFilter::ThisWeek => is_open_this_week(schedule, now, tz),
        }
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFilter {
    type Err = FinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str() == s.trim())
            .ok_or_else(|| FinderError::UnknownFilter(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_with_hours_is_parsed_as_weekly() {
        let record: LocationRecord = serde_json::from_value(json!({
            "id": "loc-1",
            "name": {"en": "Grace Pantry", "es": "Despensa Grace"},
            "hours": {"tuesday": "9:00 AM - 12:00 PM"},
            "rawScheduleText": {"en": "Tuesdays 9-12", "es": "Martes 9-12"},
            "tags": ["Walk-up"]
        }))
        .unwrap();

        let location = record.into_location();
        assert_eq!(location.schedule.kind(), "weekly");
        assert_eq!(location.tags, vec![ServiceTag::WalkUp]);
        assert!(!location.hidden);
    }

    #[test]
    fn record_with_special_text_is_parsed_as_special() {
        let record: LocationRecord = serde_json::from_value(json!({
            "id": "loc-2",
            "name": {"en": "Harbor Church"},
            "rawScheduleText": {"en": "2nd and 4th Saturday 8:00 - 10:00 a.m."}
        }))
        .unwrap();
        assert_eq!(record.into_location().schedule.kind(), "special");
    }

    #[test]
    fn structured_schedule_wins_over_raw_fields() {
        let record: LocationRecord = serde_json::from_value(json!({
            "id": "loc-3",
            "name": {"en": "Mesa Food Share"},
            "schedule": {"type": "unknown", "rawText": "By appointment"},
            "hours": {"monday": "9 - 12"}
        }))
        .unwrap();
        assert_eq!(
            record.into_location().schedule,
            SchedulePattern::Unknown {
                raw_text: "By appointment".to_string()
            }
        );
    }

    #[test]
    fn record_without_schedule_info_is_unknown() {
        let record: LocationRecord =
            serde_json::from_value(json!({"id": "loc-4", "name": {"en": "Pop-up"}})).unwrap();
        assert_eq!(
            record.into_location().schedule,
            SchedulePattern::Unknown {
                raw_text: "Schedule not available".to_string()
            }
        );
    }

    #[test]
    fn time_filter_round_trips_through_str() {
        for filter in TimeFilter::ALL {
            assert_eq!(filter.as_str().parse::<TimeFilter>().unwrap(), filter);
        }
        assert!("next-month".parse::<TimeFilter>().is_err());
        assert_eq!(
            serde_json::to_string(&TimeFilter::ThisWeek).unwrap(),
            "\"this-week\""
        );
    }
}
