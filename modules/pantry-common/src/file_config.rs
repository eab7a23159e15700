use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::region::RegionConfig;

/// TOML-backed configuration loaded from disk.
///
/// ```toml
/// default_region = "tucson"
///
/// [[regions]]
/// id = "tucson"
/// name = "Tucson"
/// timezone = "America/Phoenix"
/// default_center = { lat = 32.2226, lng = -110.9747 }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub default_region: Option<String>,
    #[serde(default)]
    pub regions: Vec<RegionConfig>,
}

/// Parse TOML config text. Every region's timezone must be a known IANA zone.
pub fn parse_config(content: &str) -> Result<FileConfig> {
    let config: FileConfig = toml::from_str(content).context("Failed to parse config TOML")?;
    for region in &config.regions {
        region
            .tz()
            .with_context(|| format!("Region {} has an invalid timezone", region.id))?;
    }
    Ok(config)
}

/// Load and parse a TOML config file.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Failed to load config file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_regions() {
        let config = parse_config(
            r#"
default_region = "tucson"

[[regions]]
id = "tucson"
name = "Tucson"
timezone = "America/Phoenix"
default_center = { lat = 32.2226, lng = -110.9747 }
"#,
        )
        .unwrap();
        assert_eq!(config.default_region.as_deref(), Some("tucson"));
        assert_eq!(config.regions.len(), 1);
        assert_eq!(config.regions[0].timezone, "America/Phoenix");
    }

    #[test]
    fn rejects_bad_timezone() {
        let err = parse_config(
            r#"
[[regions]]
id = "nowhere"
name = "Nowhere"
timezone = "Not/A_Zone"
default_center = { lat = 0.0, lng = 0.0 }
"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(parse_config("colour = \"blue\"").is_err());
    }
}
