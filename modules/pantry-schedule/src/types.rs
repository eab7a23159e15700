use chrono::{DateTime, NaiveTime, TimeDelta, Utc, Weekday};
use serde::{Deserialize, Serialize};

// --- Time Types ---

/// Wall-clock time of day. Carries no date and no zone; the zone is supplied
/// when a schedule is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeOfDay")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

#[derive(Deserialize)]
struct RawTimeOfDay {
    hour: u8,
    minute: u8,
}

impl TryFrom<RawTimeOfDay> for TimeOfDay {
    type Error = String;

    fn try_from(raw: RawTimeOfDay) -> Result<Self, Self::Error> {
        TimeOfDay::new(raw.hour, raw.minute)
            .ok_or_else(|| format!("time out of range: {}:{:02}", raw.hour, raw.minute))
    }
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { hour: 0, minute: 0 };

    /// Returns `None` unless `hour` is 0-23 and `minute` is 0-59.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour <= 23 && minute <= 59).then_some(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes elapsed since midnight.
    pub fn minutes(&self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        NaiveTime::MIN + TimeDelta::minutes(i64::from(self.minutes()))
    }
}

/// A single contiguous opening window within one day.
///
/// `close` is on the same day as `open`; windows never wrap past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub open: TimeOfDay,
    pub close: TimeOfDay,
}

impl TimeRange {
    pub fn new(open: TimeOfDay, close: TimeOfDay) -> Self {
        Self { open, close }
    }
}

// --- Schedules ---

/// Fixed hours per weekday, repeating every week. `None` means closed all day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeeklySchedule {
    #[serde(default)]
    pub monday: Option<TimeRange>,
    #[serde(default)]
    pub tuesday: Option<TimeRange>,
    #[serde(default)]
    pub wednesday: Option<TimeRange>,
    #[serde(default)]
    pub thursday: Option<TimeRange>,
    #[serde(default)]
    pub friday: Option<TimeRange>,
    #[serde(default)]
    pub saturday: Option<TimeRange>,
    #[serde(default)]
    pub sunday: Option<TimeRange>,
}

impl WeeklySchedule {
    pub fn get(&self, weekday: Weekday) -> Option<&TimeRange> {
        self.slot(weekday).as_ref()
    }

    pub fn set(&mut self, weekday: Weekday, range: Option<TimeRange>) {
        *self.slot_mut(weekday) = range;
    }

    /// True if at least one day has hours.
    pub fn has_hours(&self) -> bool {
        WEEKDAYS.iter().any(|day| self.get(*day).is_some())
    }

    fn slot(&self, weekday: Weekday) -> &Option<TimeRange> {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    fn slot_mut(&mut self, weekday: Weekday) -> &mut Option<TimeRange> {
        match weekday {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        }
    }
}

/// Sunday-first, matching the index used on the wire.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Lowercase field name used for a weekday in raw location data.
pub fn weekday_key(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Sunday = 0 ... Saturday = 6.
pub fn weekday_from_sunday_index(index: u8) -> Option<Weekday> {
    WEEKDAYS.get(usize::from(index)).copied()
}

/// "The Nth weekday(s) of every month", e.g. 1st and 3rd Wednesday.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialPattern {
    #[serde(with = "weekday_index")]
    pub weekday: Weekday,
    /// Distinct values in 1..=5, ascending
    pub occurrences: Vec<u8>,
    pub time_range: TimeRange,
}

impl SpecialPattern {
    /// Drops occurrence indices outside 1..=5 and duplicates. Returns `None`
    /// when nothing valid is left.
    pub fn new(
        weekday: Weekday,
        occurrences: impl IntoIterator<Item = u8>,
        time_range: TimeRange,
    ) -> Option<Self> {
        let mut occurrences: Vec<u8> = occurrences
            .into_iter()
            .filter(|n| (1..=5).contains(n))
            .collect();
        occurrences.sort_unstable();
        occurrences.dedup();
        if occurrences.is_empty() {
            return None;
        }
        Some(Self {
            weekday,
            occurrences,
            time_range,
        })
    }
}

/// The one schedule representation active for a location. Built once from raw
/// data and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchedulePattern {
    Weekly {
        schedule: WeeklySchedule,
    },
    Special {
        pattern: SpecialPattern,
    },
    Unknown {
        #[serde(rename = "rawText")]
        raw_text: String,
    },
}

impl SchedulePattern {
    pub fn kind(&self) -> &'static str {
        match self {
            SchedulePattern::Weekly { .. } => "weekly",
            SchedulePattern::Special { .. } => "special",
            SchedulePattern::Unknown { .. } => "unknown",
        }
    }
}

// --- Availability ---

/// Verdict for one `(pattern, instant, timezone)` evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum AvailabilityStatus {
    /// Inside a window that ends at `closes_at`.
    Open { closes_at: DateTime<Utc> },
    /// Closed, next window starts within 30 minutes.
    OpeningSoon {
        opens_at: DateTime<Utc>,
        minutes_until: u32,
    },
    /// Closed. `opens_at` is `None` when no opening was found in the lookahead.
    Closed { opens_at: Option<DateTime<Utc>> },
    /// Opaque schedule; nothing can be said about time.
    Unknown,
}

impl AvailabilityStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, AvailabilityStatus::Open { .. })
    }

    pub fn is_opening_soon(&self) -> bool {
        matches!(self, AvailabilityStatus::OpeningSoon { .. })
    }

    /// Next opening instant, if the status carries one.
    pub fn opens_at(&self) -> Option<DateTime<Utc>> {
        match self {
            AvailabilityStatus::OpeningSoon { opens_at, .. } => Some(*opens_at),
            AvailabilityStatus::Closed { opens_at } => *opens_at,
            AvailabilityStatus::Open { .. } | AvailabilityStatus::Unknown => None,
        }
    }
}

pub(crate) mod weekday_index {
    use chrono::Weekday;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::weekday_from_sunday_index;

    pub fn serialize<S: Serializer>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        // num_days_from_sunday is always < 7
        serializer.serialize_u8(weekday.num_days_from_sunday() as u8)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let index = u8::deserialize(deserializer)?;
        weekday_from_sunday_index(index)
            .ok_or_else(|| D::Error::custom(format!("weekday index out of range: {index}")))
    }
}
