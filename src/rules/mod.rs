pub mod custom;
pub mod resolver;
pub mod ruleset;
pub mod tables;
pub mod validation;

pub use custom::{CustomRules, FastestLapSetting};
pub use resolver::{earliest_year, resolve};
pub use ruleset::{DropPolicy, FastestLapRule, RuleSource, Ruleset, SprintScoring};
pub use validation::validate_custom_rules;
