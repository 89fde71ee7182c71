use serde::{Deserialize, Serialize};

/// User-defined scoring rules, read from the `custom_rules` section of the
/// config file.
///
/// Example YAML:
/// ```yaml
/// custom_rules:
///   points: [25, 18, 15, 12, 10, 8, 6, 4, 2, 1]
///   drop: "split_7_7"
///   sprint_points: [8, 7, 6, 5, 4, 3, 2, 1]
///   fastest_lap: top10
///   double_points_final: false
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CustomRules {
    /// Points per finishing position, P1 first
    pub points: Vec<f64>,

    /// Drop policy: "all", "best_N" or "split_N_M" (default: "all")
    #[serde(default)]
    pub drop: Option<String>,

    /// Points per sprint finishing position (default: sprints score nothing)
    #[serde(default)]
    pub sprint_points: Option<Vec<f64>>,

    /// Fastest-lap reward (default: none)
    #[serde(default)]
    pub fastest_lap: Option<FastestLapSetting>,

    /// Double points for the final round (default: false)
    #[serde(default)]
    pub double_points_final: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FastestLapSetting {
    #[default]
    None,
    Shared,
    Top10,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_custom_rules_parse() {
        let yaml = r#"
points: [25, 18, 15, 12, 10, 8, 6, 4, 2, 1]
drop: "split_7_7"
sprint_points: [8, 7, 6, 5, 4, 3, 2, 1]
fastest_lap: top10
double_points_final: true
"#;
        let rules: CustomRules = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(rules.points.len(), 10);
        assert_eq!(rules.points[0], 25.0);
        assert_eq!(rules.drop.as_deref(), Some("split_7_7"));
        assert_eq!(rules.sprint_points.unwrap().len(), 8);
        assert_eq!(rules.fastest_lap, Some(FastestLapSetting::Top10));
        assert_eq!(rules.double_points_final, Some(true));
    }

    #[test]
    fn test_minimal_custom_rules_parse() {
        let yaml = "points: [9, 6, 4, 3, 2, 1]";
        let rules: CustomRules = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(rules.points, vec![9.0, 6.0, 4.0, 3.0, 2.0, 1.0]);
        assert!(rules.drop.is_none());
        assert!(rules.sprint_points.is_none());
        assert!(rules.fastest_lap.is_none());
        assert!(rules.double_points_final.is_none());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "points: [1]\nbonus: 3";
        assert!(serde_saphyr::from_str::<CustomRules>(yaml).is_err());
    }

    #[test]
    fn test_custom_rules_serde_roundtrip() {
        let rules = CustomRules {
            points: vec![10.0, 6.0, 4.0],
            drop: Some("best_11".to_string()),
            sprint_points: None,
            fastest_lap: Some(FastestLapSetting::Shared),
            double_points_final: None,
        };
        let yaml = serde_saphyr::to_string(&rules).unwrap();
        let parsed: CustomRules = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(rules, parsed);
    }
}
