use std::collections::BTreeMap;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use pantry_schedule::{parse_timezone, ScheduleError};

use crate::file_config::FileConfig;
use crate::location::Coordinates;

pub const DEFAULT_REGION: &str = "san-diego";

/// A service area: where the map centers and which zone its schedules are read in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionConfig {
    pub id: String,
    pub name: String,
    pub default_center: Coordinates,
    /// IANA zone, e.g. "America/Los_Angeles"
    pub timezone: String,
}

impl RegionConfig {
    fn new(id: &str, name: &str, center: Coordinates, timezone: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            default_center: center,
            timezone: timezone.to_string(),
        }
    }

    pub fn tz(&self) -> Result<Tz, ScheduleError> {
        parse_timezone(&self.timezone)
    }
}

fn production_regions() -> Vec<RegionConfig> {
    vec![RegionConfig::new(
        "san-diego",
        "San Diego",
        Coordinates::new(32.7157, -117.1611),
        "America/Los_Angeles",
    )]
}

fn dev_regions() -> Vec<RegionConfig> {
    vec![
        RegionConfig::new(
            "riverside",
            "Riverside",
            Coordinates::new(33.9533, -117.3962),
            "America/Los_Angeles",
        ),
        RegionConfig::new(
            "houston",
            "Houston",
            Coordinates::new(29.7601, -95.3701),
            "America/Chicago",
        ),
    ]
}

/// Known regions keyed by id, with a fallback for unrecognized ids.
#[derive(Debug, Clone)]
pub struct RegionRegistry {
    regions: BTreeMap<String, RegionConfig>,
    default_id: String,
}

impl RegionRegistry {
    /// Built-in production regions, dev regions when enabled, then any
    /// regions from the config file (which replace built-ins with the same id).
    pub fn new(include_dev: bool, file: Option<&FileConfig>) -> Self {
        let mut regions: BTreeMap<String, RegionConfig> = production_regions()
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect();

        if include_dev {
            regions.extend(dev_regions().into_iter().map(|r| (r.id.clone(), r)));
        }

        let mut default_id = DEFAULT_REGION.to_string();
        if let Some(file) = file {
            regions.extend(file.regions.iter().cloned().map(|r| (r.id.clone(), r)));
            if let Some(id) = &file.default_region {
                if regions.contains_key(id) {
                    default_id = id.clone();
                } else {
                    tracing::warn!(region = id.as_str(), "Configured default region is not defined, ignoring");
                }
            }
        }

        Self {
            regions,
            default_id,
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn get(&self, id: &str) -> Option<&RegionConfig> {
        self.regions.get(id)
    }

    pub fn default_region(&self) -> &RegionConfig {
        // default_id is always a key: either DEFAULT_REGION (production) or a checked file value
        &self.regions[&self.default_id]
    }

    /// The requested region, or the default when the id is absent or unknown.
    pub fn resolve(&self, id: Option<&str>) -> &RegionConfig {
        match id {
            Some(id) => self.get(id).unwrap_or_else(|| {
                tracing::warn!(region = id, "Unknown region, using default");
                self.default_region()
            }),
            None => self.default_region(),
        }
    }
}
