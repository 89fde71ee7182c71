use super::custom::CustomRules;
use super::ruleset::DropPolicy;

/// Validate custom rules at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_custom_rules(rules: &CustomRules) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if rules.points.is_empty() {
        errors.push("custom_rules.points: must list at least one position".to_string());
    }
    check_points("custom_rules.points", &rules.points, &mut errors);

    if let Some(ref sprint) = rules.sprint_points {
        check_points("custom_rules.sprint_points", sprint, &mut errors);
    }

    if let Some(ref drop) = rules.drop {
        match DropPolicy::parse(drop) {
            Ok(DropPolicy::BestOf(0)) => {
                errors.push("custom_rules.drop: best-of count must be at least 1".to_string());
            }
            Ok(DropPolicy::Split { first, second }) if first == 0 && second == 0 => {
                errors.push("custom_rules.drop: split limits cannot both be 0".to_string());
            }
            Ok(_) => {}
            Err(e) => errors.push(format!("custom_rules.drop: invalid '{}' - {}", drop, e)),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_points(field: &str, points: &[f64], errors: &mut Vec<String>) {
    for (i, value) in points.iter().enumerate() {
        if !value.is_finite() || *value < 0.0 {
            errors.push(format!("{}[{}]: must be a non-negative number", field, i));
        }
    }
}
