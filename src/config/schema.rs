use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::rules::CustomRules;

/// Contents of `config.yaml`. Every field is optional; CLI flags win.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u16>,
    /// Rule year to apply; falls back to the season
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_cache: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_rules: Option<CustomRules>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::FastestLapSetting;

    #[test]
    fn test_empty_config_parses() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_full_config_parses() {
        let yaml = r#"
data_dir: /tmp/seasons
season: 1976
rules_year: 2010
no_cache: true
custom_rules:
  points: [25, 18, 15]
  drop: "split_7_7"
  fastest_lap: "top10"
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/seasons")));
        assert_eq!(config.season, Some(1976));
        assert_eq!(config.rules_year, Some(2010));
        assert_eq!(config.no_cache, Some(true));
        let custom = config.custom_rules.unwrap();
        assert_eq!(custom.points, vec![25.0, 18.0, 15.0]);
        assert_eq!(custom.drop.as_deref(), Some("split_7_7"));
        assert_eq!(custom.fastest_lap, Some(FastestLapSetting::Top10));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(serde_saphyr::from_str::<Config>("queries: []").is_err());
    }
}
