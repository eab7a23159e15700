use std::path::PathBuf;

use anyhow::Result;

pub const DEFAULT_DATA_PATH: &str = "data/locations.json";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Location dataset (JSON array of records)
    pub data_path: PathBuf,
    /// Region id; unknown ids fall back to the default region
    pub region: Option<String>,
    /// Overrides the region's timezone when set
    pub timezone: Option<String>,
    /// Expose dev-only regions
    pub dev_regions: bool,
    /// Optional TOML file with extra regions
    pub config_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `FINDER_*` environment variables, reading a
    /// `.env` file first if one exists.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let config = Self::from_vars(|key| std::env::var(key).ok());
        config.log_summary();
        Ok(config)
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            data_path: var("FINDER_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            region: var("FINDER_REGION"),
            timezone: var("FINDER_TIMEZONE"),
            dev_regions: var("FINDER_DEV_REGIONS")
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            config_path: var("FINDER_CONFIG").map(PathBuf::from),
        }
    }

    pub fn log_summary(&self) {
        fn or_unset(val: &Option<String>) -> &str {
            val.as_deref().unwrap_or("<not set>")
        }

        tracing::info!("Config loaded:");
        tracing::info!("  FINDER_DATA_PATH: {}", self.data_path.display());
        tracing::info!("  FINDER_REGION: {}", or_unset(&self.region));
        tracing::info!("  FINDER_TIMEZONE: {}", or_unset(&self.timezone));
        tracing::info!("  FINDER_DEV_REGIONS: {}", self.dev_regions);
        tracing::info!(
            "  FINDER_CONFIG: {}",
            self.config_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<not set>".to_string())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = from_map(&[]);
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert!(config.region.is_none());
        assert!(config.timezone.is_none());
        assert!(!config.dev_regions);
        assert!(config.config_path.is_none());
    }

    #[test]
    fn reads_all_vars() {
        let config = from_map(&[
            ("FINDER_DATA_PATH", "/srv/pantry/locations.json"),
            ("FINDER_REGION", "houston"),
            ("FINDER_TIMEZONE", "America/Chicago"),
            ("FINDER_DEV_REGIONS", "TRUE"),
            ("FINDER_CONFIG", "finder.toml"),
        ]);
        assert_eq!(config.data_path, PathBuf::from("/srv/pantry/locations.json"));
        assert_eq!(config.region.as_deref(), Some("houston"));
        assert_eq!(config.timezone.as_deref(), Some("America/Chicago"));
        assert!(config.dev_regions);
        assert_eq!(config.config_path, Some(PathBuf::from("finder.toml")));
    }

    #[test]
    fn blank_values_are_unset() {
        let config = from_map(&[("FINDER_REGION", "  "), ("FINDER_DEV_REGIONS", "yes")]);
        assert!(config.region.is_none());
        assert!(!config.dev_regions);
    }
}
