use std::path::{Path, PathBuf};

use tracing::{info, warn};

use pantry_common::{FinderError, FoodLocation, LocationRecord};
use pantry_schedule::SchedulePattern;

/// Sample dataset shipped with the repo, used when the configured one is missing.
pub const EXAMPLE_DATA_PATH: &str = "data/locations.example.json";

/// The configured dataset if it exists, otherwise the bundled example.
pub fn resolve_data_path(configured: &Path) -> PathBuf {
    if configured.exists() {
        return configured.to_path_buf();
    }
    let example = Path::new(EXAMPLE_DATA_PATH);
    if example.exists() {
        warn!(
            configured = %configured.display(),
            fallback = EXAMPLE_DATA_PATH,
            "Dataset not found, using example data"
        );
        return example.to_path_buf();
    }
    configured.to_path_buf()
}

/// Parse a JSON array of location records, resolving each schedule.
pub fn parse_locations(json: &str) -> Result<Vec<FoodLocation>, FinderError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_array() {
        return Err(FinderError::Dataset(
            "expected a JSON array of locations".to_string(),
        ));
    }
    let records: Vec<LocationRecord> = serde_json::from_value(value)?;
    let locations: Vec<FoodLocation> = records
        .into_iter()
        .map(LocationRecord::into_location)
        .collect();

    let (mut weekly, mut special, mut unknown) = (0usize, 0usize, 0usize);
    for location in &locations {
        match location.schedule {
            SchedulePattern::Weekly { .. } => weekly += 1,
            SchedulePattern::Special { .. } => special += 1,
            SchedulePattern::Unknown { .. } => unknown += 1,
        }
    }
    info!(
        count = locations.len(),
        weekly, special, unknown, "Parsed location schedules"
    );
    Ok(locations)
}

pub fn load_locations(path: &Path) -> Result<Vec<FoodLocation>, FinderError> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        FinderError::Dataset(format!("failed to read {}: {e}", path.display()))
    })?;
    let locations = parse_locations(&json)?;
    info!(path = %path.display(), count = locations.len(), "Loaded locations");
    Ok(locations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_array_documents() {
        let err = parse_locations(r#"{"id": "loc-1"}"#).unwrap_err();
        assert!(matches!(err, FinderError::Dataset(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            parse_locations("[{").unwrap_err(),
            FinderError::Json(_)
        ));
    }

    #[test]
    fn missing_file_is_a_dataset_error() {
        let err = load_locations(Path::new("/nonexistent/locations.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/locations.json"));
    }

    #[test]
    fn parses_mixed_schedule_kinds() {
        let json = r#"[
            {"id": "a", "name": {"en": "A"}, "hours": {"monday": "9 - 12"}},
            {"id": "b", "name": {"en": "B"}, "rawScheduleText": {"en": "3rd Friday 10 - 11"}},
            {"id": "c", "name": {"en": "C"}, "rawScheduleText": {"en": "Call ahead"}}
        ]"#;
        let kinds: Vec<&str> = parse_locations(json)
            .unwrap()
            .iter()
            .map(|l| l.schedule.kind())
            .collect();
        assert_eq!(kinds, vec!["weekly", "special", "unknown"]);
    }
}
