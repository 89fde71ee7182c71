pub mod derive;
pub mod loader;
pub mod record;

pub use derive::{with_inferred_fastest_laps, with_shared_factors};
pub use loader::{available_seasons, load_season, parse_season, season_path, Season};
pub use record::{rounds, total_rounds, Classification, EventRecord, SessionKind};
